//! Mock provider for testing without real hardware
//!
//! Returns fixed `(level, scale, model)` values that tests can change or
//! turn into failures at runtime.
//!
//! # Usage
//!
//! ```
//! use devinfo_hal::mock::{MockProfile, MockProvider};
//! use devinfo_hal::SystemInfoProvider;
//!
//! let provider = MockProvider::new(MockProfile::Pixel6);
//! assert_eq!(provider.battery().unwrap().percentage(), 50.0);
//!
//! provider.set_battery(20, 100);
//! assert_eq!(provider.battery().unwrap().percentage(), 20.0);
//! ```

use crate::provider::{BatterySnapshot, HalError, SystemInfoProvider};
use std::sync::{Arc, RwLock};

/// Environment variable selecting the mock profile
pub const MOCK_DEVICE_ENV: &str = "DEVINFO_MOCK_DEVICE";

/// Pre-defined mock devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockProfile {
    /// Google Pixel 6 at half charge
    Pixel6,
    /// Samsung Galaxy S21 on a 0-255 scale
    GalaxyS21,
    /// Android emulator image
    Emulator,
    /// Desktop without a battery: both values unknown
    Desktop,
}

impl MockProfile {
    /// Initial state for this profile
    pub fn to_state(self) -> MockState {
        let (level, scale, model) = match self {
            MockProfile::Pixel6 => (50, 100, "Pixel 6"),
            MockProfile::GalaxyS21 => (200, 255, "SM-G991B"),
            MockProfile::Emulator => (100, 100, "sdk_gphone64_x86_64"),
            MockProfile::Desktop => (-1, -1, "Desktop"),
        };

        MockState {
            battery: Ok(BatterySnapshot::new(level, scale)),
            model: Ok(model.to_string()),
        }
    }

    /// Parse from name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "pixel6" => Some(MockProfile::Pixel6),
            "galaxys21" | "smg991b" => Some(MockProfile::GalaxyS21),
            "emulator" => Some(MockProfile::Emulator),
            "desktop" => Some(MockProfile::Desktop),
            _ => None,
        }
    }
}

/// Values the mock hands out; an `Err` holds the failure message
#[derive(Debug, Clone)]
pub struct MockState {
    pub battery: Result<BatterySnapshot, String>,
    pub model: Result<String, String>,
}

/// Mock provider for testing
#[derive(Debug, Clone)]
pub struct MockProvider {
    state: Arc<RwLock<MockState>>,
}

impl MockProvider {
    /// Create a new mock provider with the given profile
    pub fn new(profile: MockProfile) -> Self {
        Self::from_state(profile.to_state())
    }

    /// Create from explicit values
    pub fn fixed(level: i32, scale: i32, model: impl Into<String>) -> Self {
        Self::from_state(MockState {
            battery: Ok(BatterySnapshot::new(level, scale)),
            model: Ok(model.into()),
        })
    }

    fn from_state(state: MockState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Create from environment variable or default to Desktop
    pub fn from_env() -> Self {
        let profile = std::env::var(MOCK_DEVICE_ENV)
            .ok()
            .and_then(|s| MockProfile::from_name(&s))
            .unwrap_or(MockProfile::Desktop);

        Self::new(profile)
    }

    /// Simulate a battery reading
    pub fn set_battery(&self, level: i32, scale: i32) {
        if let Ok(mut state) = self.state.write() {
            state.battery = Ok(BatterySnapshot::new(level, scale));
        }
    }

    /// Simulate a model change
    pub fn set_model(&self, model: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state.model = Ok(model.into());
        }
    }

    /// Make subsequent battery queries fail
    pub fn fail_battery(&self, message: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state.battery = Err(message.into());
        }
    }

    /// Make subsequent model queries fail
    pub fn fail_model(&self, message: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state.model = Err(message.into());
        }
    }

    fn snapshot(&self) -> Option<MockState> {
        self.state.read().ok().map(|s| s.clone())
    }
}

impl SystemInfoProvider for MockProvider {
    fn battery(&self) -> Result<BatterySnapshot, HalError> {
        self.snapshot()
            .ok_or_else(|| HalError::BatteryQueryFailed("mock state poisoned".to_string()))?
            .battery
            .map_err(HalError::BatteryQueryFailed)
    }

    fn model(&self) -> Result<String, HalError> {
        self.snapshot()
            .ok_or_else(|| HalError::ModelQueryFailed("mock state poisoned".to_string()))?
            .model
            .map_err(HalError::ModelQueryFailed)
    }
}
