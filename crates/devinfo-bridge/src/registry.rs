//! Module registry
//!
//! Built once from the application's package list, then read-only.

use crate::module::NativeModule;
use crate::package::{AppContext, Package};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Module registered more than once: {0}")]
    DuplicateModule(String),
}

/// Collects packages before the registry is frozen
#[derive(Default)]
pub struct ModuleRegistryBuilder {
    packages: Vec<Box<dyn Package>>,
}

impl ModuleRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a package to the list
    pub fn add_package(mut self, package: Box<dyn Package>) -> Self {
        self.packages.push(package);
        self
    }

    /// Append several packages, keeping their order
    pub fn add_packages(mut self, packages: impl IntoIterator<Item = Box<dyn Package>>) -> Self {
        self.packages.extend(packages);
        self
    }

    /// Create every package's modules and index them by name
    pub fn build(self, ctx: &AppContext) -> Result<ModuleRegistry, RegistryError> {
        let mut modules: HashMap<String, Arc<dyn NativeModule>> = HashMap::new();

        for package in &self.packages {
            for module in package.create_modules(ctx) {
                let name = module.name().to_string();
                if modules.contains_key(&name) {
                    return Err(RegistryError::DuplicateModule(name));
                }
                tracing::debug!("Registered module {}", name);
                modules.insert(name, module);
            }
        }

        tracing::info!(
            "Module registry ready with {} module(s) from {} package(s)",
            modules.len(),
            self.packages.len()
        );
        Ok(ModuleRegistry { modules })
    }
}

/// Immutable name-to-module map
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn NativeModule>>,
}

impl ModuleRegistry {
    pub fn builder() -> ModuleRegistryBuilder {
        ModuleRegistryBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn NativeModule>> {
        self.modules.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Registered module names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::DeviceInfoPackage;
    use crate::promise::Promise;
    use devinfo_hal::mock::{MockProfile, MockProvider};
    use serde_json::Value;

    struct EchoModule;

    impl NativeModule for EchoModule {
        fn name(&self) -> &str {
            "EchoModule"
        }

        fn methods(&self) -> &[&'static str] {
            &["echo"]
        }

        fn invoke(&self, _method: &str, args: Value, promise: Promise) {
            promise.resolve(args);
        }
    }

    struct EchoPackage;

    impl Package for EchoPackage {
        fn create_modules(&self, _ctx: &AppContext) -> Vec<Arc<dyn NativeModule>> {
            vec![Arc::new(EchoModule)]
        }
    }

    fn ctx() -> AppContext {
        AppContext::new(Arc::new(MockProvider::new(MockProfile::Pixel6)))
    }

    #[test]
    fn test_empty_registry() {
        let registry = ModuleRegistry::builder().build(&ctx()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.get("DeviceInfoModule").is_none());
    }

    #[test]
    fn test_device_info_registered_once() {
        let registry = ModuleRegistry::builder()
            .add_package(Box::new(EchoPackage))
            .add_package(Box::new(DeviceInfoPackage))
            .build(&ctx())
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("DeviceInfoModule"));
        assert_eq!(registry.names(), vec!["DeviceInfoModule", "EchoModule"]);
        assert_eq!(
            registry.names().iter().filter(|n| **n == "DeviceInfoModule").count(),
            1
        );
    }

    #[test]
    fn test_duplicate_module_rejected() {
        let packages: Vec<Box<dyn Package>> =
            vec![Box::new(DeviceInfoPackage), Box::new(DeviceInfoPackage)];
        let result = ModuleRegistry::builder().add_packages(packages).build(&ctx());

        match result {
            Err(RegistryError::DuplicateModule(name)) => assert_eq!(name, "DeviceInfoModule"),
            Ok(_) => panic!("duplicate registration was accepted"),
        }
    }
}
