//! Packages contribute modules to the registry at startup

use crate::module::{DeviceInfoModule, NativeModule};
use devinfo_hal::SystemInfoProvider;
use std::sync::Arc;

/// Application-wide state handed to packages while modules are created
#[derive(Clone)]
pub struct AppContext {
    provider: Arc<dyn SystemInfoProvider>,
}

impl AppContext {
    pub fn new(provider: Arc<dyn SystemInfoProvider>) -> Self {
        Self { provider }
    }

    /// Source of battery and model readings
    pub fn provider(&self) -> Arc<dyn SystemInfoProvider> {
        Arc::clone(&self.provider)
    }
}

/// A bundle of native modules
pub trait Package: Send + Sync {
    fn create_modules(&self, ctx: &AppContext) -> Vec<Arc<dyn NativeModule>>;
}

/// Registers [`DeviceInfoModule`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceInfoPackage;

impl Package for DeviceInfoPackage {
    fn create_modules(&self, ctx: &AppContext) -> Vec<Arc<dyn NativeModule>> {
        vec![Arc::new(DeviceInfoModule::new(ctx.provider()))]
    }
}
