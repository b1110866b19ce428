//! One-shot result channel between a module and the host

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::oneshot;

/// Code carried by every rejection from this crate's modules
pub const ERROR_CODE: &str = "ERROR";

/// Rejection payload as seen by the scripting layer
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct Rejection {
    pub code: String,
    pub message: String,
}

impl Rejection {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Outcome of a module call
pub type Settlement = Result<Value, Rejection>;

/// Handle a module settles exactly once.
///
/// Both `resolve` and `reject` consume the promise. Dropping it unsettled
/// closes the channel, which the waiting side sees as a dropped call.
#[derive(Debug)]
pub struct Promise {
    tx: oneshot::Sender<Settlement>,
}

impl Promise {
    /// Create a promise and the receiver its settlement arrives on
    pub fn channel() -> (Self, oneshot::Receiver<Settlement>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn resolve(self, value: Value) {
        // The caller may have stopped waiting
        let _ = self.tx.send(Ok(value));
    }

    pub fn reject(self, code: impl Into<String>, message: impl Into<String>) {
        let _ = self.tx.send(Err(Rejection::new(code, message)));
    }
}
