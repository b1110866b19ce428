//! System info provider interface
//!
//! Defines the boundary between the bridge and the operating system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HalError {
    #[error("Battery status unavailable: {0}")]
    BatteryUnavailable(String),

    #[error("Battery query failed: {0}")]
    BatteryQueryFailed(String),

    #[error("Device model query failed: {0}")]
    ModelQueryFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw battery reading as reported by the OS.
///
/// Either field is `-1` when the OS does not know the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatterySnapshot {
    pub level: i32,
    pub scale: i32,
}

impl BatterySnapshot {
    /// Both values unknown
    pub const UNKNOWN: Self = Self {
        level: -1,
        scale: -1,
    };

    pub fn new(level: i32, scale: i32) -> Self {
        Self { level, scale }
    }

    /// Charge as a percentage of `scale`.
    ///
    /// Plain floating-point arithmetic with no clamping: sentinel `-1` values
    /// and a zero scale pass straight through (`-1/-1` gives `100.0`, `x/0`
    /// gives an infinity or `NaN`).
    pub fn percentage(&self) -> f64 {
        f64::from(self.level) * 100.0 / f64::from(self.scale)
    }
}

/// Source of battery and model information.
///
/// Implementations must be cheap to call repeatedly and safe to call from any
/// thread; each call reads the current OS state.
pub trait SystemInfoProvider: Send + Sync {
    /// Read the latest battery status
    fn battery(&self) -> Result<BatterySnapshot, HalError>;

    /// Read the device model identifier, unmodified
    fn model(&self) -> Result<String, HalError>;
}

impl<P: SystemInfoProvider + ?Sized> SystemInfoProvider for std::sync::Arc<P> {
    fn battery(&self) -> Result<BatterySnapshot, HalError> {
        (**self).battery()
    }

    fn model(&self) -> Result<String, HalError> {
        (**self).model()
    }
}
