//! Device info bridge
//!
//! Exposes a single native module, `DeviceInfoModule`, to a scripting host.
//! Its one method, `getDeviceInfo`, resolves with
//! `{ batteryLevel: number, deviceModel: string }` or rejects with
//! `{ code: "ERROR", message: string }`.
//!
//! Modules reach the host through [`Package`]s collected into an immutable
//! [`ModuleRegistry`] at startup. The [`Host`] then routes calls by module
//! and method name.
//!
//! # Example
//!
//! ```no_run
//! use devinfo_bridge::{AppContext, DeviceInfoPackage, Host, ModuleRegistry};
//! use devinfo_hal::mock::{MockProfile, MockProvider};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = AppContext::new(Arc::new(MockProvider::new(MockProfile::Pixel6)));
//! let registry = ModuleRegistry::builder()
//!     .add_package(Box::new(DeviceInfoPackage))
//!     .build(&ctx)?;
//!
//! let host = Host::new(registry);
//! let info = host
//!     .call("DeviceInfoModule", "getDeviceInfo", serde_json::Value::Null)
//!     .await?;
//! println!("{}", info);
//! # Ok(())
//! # }
//! ```

pub mod host;
pub mod module;
pub mod package;
pub mod promise;
pub mod registry;
pub mod value;

pub use host::{BridgeError, Host};
pub use module::{AccessError, DeviceInfoModule, NativeModule};
pub use package::{AppContext, DeviceInfoPackage, Package};
pub use promise::{ERROR_CODE, Promise, Rejection, Settlement};
pub use registry::{ModuleRegistry, ModuleRegistryBuilder, RegistryError};
pub use value::DeviceInfoResult;
