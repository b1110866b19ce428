//! Native modules and the device info accessor

use crate::promise::{ERROR_CODE, Promise};
use crate::value::DeviceInfoResult;
use devinfo_hal::{HalError, SystemInfoProvider};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// A unit of native functionality callable from the scripting layer.
///
/// `invoke` must settle `promise` (or drop it) before returning or hand it to
/// work that will. The host picks the thread `invoke` runs on.
pub trait NativeModule: Send + Sync {
    /// Name the module is registered under
    fn name(&self) -> &str;

    /// Methods `invoke` understands
    fn methods(&self) -> &[&'static str];

    fn invoke(&self, method: &str, args: Value, promise: Promise);
}

/// Why a device info snapshot could not be taken
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("{0}")]
    BatteryQueryFailed(#[source] HalError),

    #[error("{0}")]
    ModelQueryFailed(#[source] HalError),
}

const DEVICE_INFO_METHODS: &[&str] = &[DeviceInfoModule::GET_DEVICE_INFO];

/// Module reporting battery level and device model
pub struct DeviceInfoModule {
    provider: Arc<dyn SystemInfoProvider>,
}

impl DeviceInfoModule {
    pub const NAME: &'static str = "DeviceInfoModule";
    pub const GET_DEVICE_INFO: &'static str = "getDeviceInfo";

    pub fn new(provider: Arc<dyn SystemInfoProvider>) -> Self {
        Self { provider }
    }

    /// Take a fresh snapshot.
    ///
    /// Battery first, then model. Either failure aborts the whole read.
    pub fn device_info(&self) -> Result<DeviceInfoResult, AccessError> {
        let battery = self
            .provider
            .battery()
            .map_err(AccessError::BatteryQueryFailed)?;

        let device_model = self
            .provider
            .model()
            .map_err(AccessError::ModelQueryFailed)?;

        Ok(DeviceInfoResult {
            battery_level: battery.percentage(),
            device_model,
        })
    }

    fn get_device_info(&self, promise: Promise) {
        match self.device_info() {
            Ok(info) => promise.resolve(serde_json::to_value(info).unwrap_or_default()),
            Err(e) => promise.reject(ERROR_CODE, e.to_string()),
        }
    }
}

impl NativeModule for DeviceInfoModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn methods(&self) -> &[&'static str] {
        DEVICE_INFO_METHODS
    }

    fn invoke(&self, method: &str, _args: Value, promise: Promise) {
        match method {
            Self::GET_DEVICE_INFO => self.get_device_info(promise),
            other => promise.reject(ERROR_CODE, format!("Unknown method: {}", other)),
        }
    }
}
