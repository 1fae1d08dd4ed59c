//! Stream emitter: the push side of a chat response body.
//!
//! The loop pushes text through a [`StreamSink`]; the HTTP layer drains the
//! paired [`ChatStream`]. A dropped receiver means the caller went away, and
//! the sink reports it so the loop can stop.

use bytes::Bytes;
use hevychat_core::error::ProviderError;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// One item of the response body: a chunk of text, or the failure that ended it.
pub type StreamItem = Result<Bytes, ProviderError>;

/// The receiving half, consumed by the HTTP layer or the CLI.
pub type ChatStream = ReceiverStream<StreamItem>;

const DEFAULT_CAPACITY: usize = 16;

/// Create a sink/stream pair with the default buffer.
pub fn channel() -> (StreamSink, ChatStream) {
    channel_with_capacity(DEFAULT_CAPACITY)
}

pub fn channel_with_capacity(capacity: usize) -> (StreamSink, ChatStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (StreamSink { tx }, ReceiverStream::new(rx))
}

/// Push-based output sink. Sending waits while the buffer is full.
#[derive(Debug, Clone)]
pub struct StreamSink {
    tx: mpsc::Sender<StreamItem>,
}

impl StreamSink {
    /// Send a chunk. Returns `false` once the receiver is gone.
    pub async fn enqueue(&self, chunk: impl Into<Bytes>) -> bool {
        self.tx.send(Ok(chunk.into())).await.is_ok()
    }

    /// Terminate the stream with a failure. Nothing can be sent afterwards.
    pub async fn error(self, cause: ProviderError) {
        let _ = self.tx.send(Err(cause)).await;
    }

    /// Finish the stream normally.
    pub fn close(self) {}

    /// Has the caller dropped the receiving half?
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
