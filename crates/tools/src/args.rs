//! Argument extraction for tool inputs.
//!
//! Model-supplied arguments are unvalidated JSON. Numbers are rounded to the
//! nearest integer and clamped into their window; a missing or `null`
//! argument takes the declared default.

use hevychat_core::error::ToolError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A numeric argument with a default and an inclusive range.
#[derive(Debug, Clone, Copy)]
pub struct Bounded {
    pub default: u32,
    pub min: u32,
    pub max: u32,
}

impl Bounded {
    pub const fn new(default: u32, min: u32, max: u32) -> Self {
        Self { default, min, max }
    }

    /// Read `name` from `args`, defaulting and clamping it.
    pub fn resolve(&self, args: &Value, name: &str) -> Result<u32, ToolError> {
        match args.get(name) {
            None | Some(Value::Null) => Ok(self.default),
            Some(value) => {
                let n = value.as_f64().ok_or_else(|| {
                    ToolError::InvalidArguments(format!("'{name}' must be a number"))
                })?;
                Ok(self.clamp(n))
            }
        }
    }

    pub fn clamp(&self, n: f64) -> u32 {
        n.round().clamp(self.min as f64, self.max as f64) as u32
    }
}

/// A required string argument.
pub fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::InvalidArguments(format!("Missing '{name}' argument")))
}

/// Deserialize the whole argument object into a typed input.
pub fn parse<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}
