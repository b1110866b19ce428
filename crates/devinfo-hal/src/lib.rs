//! Hardware Abstraction Layer (HAL)
//!
//! Reads the two device facts the bridge exposes: the battery charge
//! (as a raw `level / scale` pair) and the device model string.
//!
//! Everything is read through the [`SystemInfoProvider`] trait so callers can
//! swap the real sysfs-backed implementation for a [`mock::MockProvider`].
//!
//! # Example
//!
//! ```no_run
//! use devinfo_hal::{SysfsProvider, SystemInfoProvider};
//!
//! fn main() -> Result<(), devinfo_hal::HalError> {
//!     let provider = SysfsProvider::new();
//!     let battery = provider.battery()?;
//!     println!("{}: {}%", provider.model()?, battery.percentage());
//!     Ok(())
//! }
//! ```

pub mod mock;
pub mod provider;
pub mod sysfs;

pub use provider::{BatterySnapshot, HalError, SystemInfoProvider};
pub use sysfs::{ModelSource, SysfsConfig, SysfsProvider};

/// HAL Result type
pub type Result<T> = std::result::Result<T, HalError>;
