//! Host-side call routing
//!
//! The host owns the threading decision: module methods run on tokio's
//! blocking pool and their settlement is awaited through the promise channel.
//! Logging of calls and rejections happens here, not in the modules.

use crate::promise::{Promise, Rejection};
use crate::registry::ModuleRegistry;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Call rejected: {0}")]
    Rejected(Rejection),

    #[error("Module dropped the promise without settling it")]
    Dropped,

    #[error("Module task failed: {0}")]
    Join(String),
}

impl BridgeError {
    /// The rejection payload, if the module rejected the call
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            BridgeError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

/// Routes scripting-layer calls to registered modules
#[derive(Clone)]
pub struct Host {
    registry: Arc<ModuleRegistry>,
}

impl Host {
    pub fn new(registry: ModuleRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Invoke `module.method(args)` and wait for it to settle
    pub async fn call(&self, module: &str, method: &str, args: Value) -> Result<Value, BridgeError> {
        let target = self
            .registry
            .get(module)
            .ok_or_else(|| BridgeError::ModuleNotFound(module.to_string()))?;

        tracing::debug!("Calling {}.{}", module, method);

        let (promise, rx) = Promise::channel();
        let method_name = method.to_string();
        tokio::task::spawn_blocking(move || target.invoke(&method_name, args, promise))
            .await
            .map_err(|e| BridgeError::Join(e.to_string()))?;

        match rx.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(rejection)) => {
                tracing::warn!("{}.{} rejected: {}", module, method, rejection);
                Err(BridgeError::Rejected(rejection))
            }
            Err(_) => {
                tracing::warn!("{}.{} dropped its promise", module, method);
                Err(BridgeError::Dropped)
            }
        }
    }
}
