//! The chat loop: the model, the Hevy tools, and the stream back to the caller.
//!
//! One turn runs as:
//!
//! 1. **Seed** the conversation with the caller's history
//! 2. **Ask the model**, offering every registered tool
//! 3. **If tool calls**: run them concurrently, append the model's turn and
//!    the ordered results, and go back to step 2
//! 4. **If text**: stream each text block to the caller and stop
//!
//! At most [`MAX_ITERATIONS`] model calls are made per turn; past that the
//! turn ends with [`CEILING_NOTICE`].

pub mod loop_runner;
pub mod prompt;
pub mod stream;

#[cfg(test)]
mod test_helpers;

pub use loop_runner::{
    CEILING_NOTICE, ChatAgent, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, LoopOutcome, MAX_ITERATIONS,
};
pub use prompt::SYSTEM_PROMPT;
pub use stream::{ChatStream, StreamItem, StreamSink};
