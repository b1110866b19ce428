//! Sysfs-backed provider
//!
//! Reads the battery from `/sys/class/power_supply` and the device model from
//! the Android build properties, the device tree or DMI, whichever answers
//! first. Nothing is cached: every call reads the files again.

use crate::provider::{BatterySnapshot, HalError, SystemInfoProvider};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where to look for the device model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSource {
    /// `key=value` property file such as Android's `build.prop`
    BuildProp { path: PathBuf, key: String },
    /// NUL-terminated device tree string
    DeviceTree { path: PathBuf },
    /// Plain one-line text file
    File { path: PathBuf },
}

impl ModelSource {
    /// Read the model from this source.
    ///
    /// Returns `Ok(None)` when the source exists but does not carry the value.
    fn read(&self) -> Result<Option<String>, HalError> {
        match self {
            ModelSource::BuildProp { path, key } => {
                let contents = fs::read_to_string(path)?;
                Ok(parse_build_prop(&contents, key))
            }
            ModelSource::DeviceTree { path } => {
                let bytes = fs::read(path)?;
                let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                Ok(Some(String::from_utf8_lossy(&bytes[..end]).into_owned()))
            }
            ModelSource::File { path } => {
                let contents = fs::read_to_string(path)?;
                let line = contents
                    .strip_suffix('\n')
                    .map(|s| s.strip_suffix('\r').unwrap_or(s))
                    .unwrap_or(&contents);
                Ok(Some(line.to_string()))
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ModelSource::BuildProp { path, .. }
            | ModelSource::DeviceTree { path }
            | ModelSource::File { path } => path,
        }
    }
}

/// Look up `key` in a `key=value` property listing.
///
/// Keys and values are trimmed the way Android's property loader does.
fn parse_build_prop(contents: &str, key: &str) -> Option<String> {
    contents
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim().to_string())
}

/// Default model lookup order
pub fn default_model_sources() -> Vec<ModelSource> {
    vec![
        ModelSource::BuildProp {
            path: PathBuf::from("/system/build.prop"),
            key: "ro.product.model".to_string(),
        },
        ModelSource::DeviceTree {
            path: PathBuf::from("/sys/firmware/devicetree/base/model"),
        },
        ModelSource::DeviceTree {
            path: PathBuf::from("/proc/device-tree/model"),
        },
        ModelSource::File {
            path: PathBuf::from("/sys/class/dmi/id/product_name"),
        },
    ]
}

/// Sysfs provider configuration
#[derive(Debug, Clone)]
pub struct SysfsConfig {
    pub power_supply_dir: PathBuf,
    /// Fixed supply name; auto-detected by `type` when unset
    pub battery_name: Option<String>,
    pub model_sources: Vec<ModelSource>,
}

impl Default for SysfsConfig {
    fn default() -> Self {
        Self {
            power_supply_dir: PathBuf::from("/sys/class/power_supply"),
            battery_name: None,
            model_sources: default_model_sources(),
        }
    }
}

/// Numerator/denominator file pairs, in order of preference.
/// A `None` denominator means a fixed scale of 100.
const CHARGE_SOURCES: &[(&str, Option<&str>)] = &[
    ("capacity", None),
    ("charge_now", Some("charge_full")),
    ("energy_now", Some("energy_full")),
];

/// Provider reading live values from sysfs
pub struct SysfsProvider {
    config: SysfsConfig,
}

impl SysfsProvider {
    /// Create a provider with the default paths
    pub fn new() -> Self {
        Self::with_config(SysfsConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(config: SysfsConfig) -> Self {
        Self { config }
    }

    /// Locate the battery supply directory
    fn find_battery(&self) -> Result<PathBuf, HalError> {
        let dir = &self.config.power_supply_dir;

        if let Some(name) = &self.config.battery_name {
            let path = dir.join(name);
            if path.is_dir() {
                return Ok(path);
            }
            return Err(HalError::BatteryUnavailable(format!(
                "{} does not exist",
                path.display()
            )));
        }

        if !dir.is_dir() {
            return Err(HalError::BatteryUnavailable(format!(
                "{} does not exist",
                dir.display()
            )));
        }

        let mut entries = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect::<Vec<_>>();
        entries.sort();

        for path in entries {
            // Read type to determine if it's a battery
            let is_battery = fs::read_to_string(path.join("type"))
                .map(|t| t.trim().eq_ignore_ascii_case("battery"))
                .unwrap_or(false);
            if is_battery {
                tracing::debug!("Found battery at {}", path.display());
                return Ok(path);
            }
        }

        Err(HalError::BatteryUnavailable(format!(
            "no battery supply under {}",
            dir.display()
        )))
    }

    /// Read integer from sysfs file, `-1` if unreadable
    fn read_sysfs_int(path: &Path) -> i32 {
        fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(-1)
    }
}

impl Default for SysfsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemInfoProvider for SysfsProvider {
    fn battery(&self) -> Result<BatterySnapshot, HalError> {
        let battery = self.find_battery()?;

        for (numerator, denominator) in CHARGE_SOURCES {
            let level_path = battery.join(numerator);
            if !level_path.exists() {
                continue;
            }

            let level = Self::read_sysfs_int(&level_path);
            let scale = match denominator {
                Some(name) => Self::read_sysfs_int(&battery.join(name)),
                None => 100,
            };

            tracing::trace!(level, scale, source = numerator, "Read battery status");
            return Ok(BatterySnapshot { level, scale });
        }

        Err(HalError::BatteryQueryFailed(format!(
            "no charge information in {}",
            battery.display()
        )))
    }

    fn model(&self) -> Result<String, HalError> {
        for source in &self.config.model_sources {
            match source.read() {
                Ok(Some(model)) => return Ok(model),
                Ok(None) => {
                    tracing::trace!("No model in {}", source.path().display());
                }
                Err(e) => {
                    tracing::trace!("Skipping {}: {}", source.path().display(), e);
                }
            }
        }

        Err(HalError::ModelQueryFailed(
            "no model source available".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn supply(root: &Path, name: &str, kind: &str, files: &[(&str, &str)]) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("type"), format!("{}\n", kind)).unwrap();
        for (file, contents) in files {
            fs::write(dir.join(file), contents).unwrap();
        }
    }

    fn provider(root: &Path, sources: Vec<ModelSource>) -> SysfsProvider {
        SysfsProvider::with_config(SysfsConfig {
            power_supply_dir: root.to_path_buf(),
            battery_name: None,
            model_sources: sources,
        })
    }

    #[test]
    fn test_sysfs_config_default() {
        let config = SysfsConfig::default();
        assert_eq!(config.power_supply_dir, PathBuf::from("/sys/class/power_supply"));
        assert!(config.battery_name.is_none());
        assert_eq!(config.model_sources.len(), 4);
    }

    #[test]
    fn test_battery_from_capacity() {
        let tmp = TempDir::new().unwrap();
        supply(tmp.path(), "ac", "Mains", &[("online", "1\n")]);
        supply(tmp.path(), "battery", "Battery", &[("capacity", "73\n")]);

        let snapshot = provider(tmp.path(), vec![]).battery().unwrap();
        assert_eq!(snapshot, BatterySnapshot::new(73, 100));
    }

    #[test]
    fn test_battery_from_charge_counters() {
        let tmp = TempDir::new().unwrap();
        supply(
            tmp.path(),
            "BAT0",
            "Battery",
            &[("charge_now", "2500000\n"), ("charge_full", "5000000\n")],
        );

        let snapshot = provider(tmp.path(), vec![]).battery().unwrap();
        assert_eq!(snapshot.percentage(), 50.0);
    }

    #[test]
    fn test_battery_missing_scale_is_unknown() {
        let tmp = TempDir::new().unwrap();
        supply(tmp.path(), "BAT0", "Battery", &[("energy_now", "100\n")]);

        let snapshot = provider(tmp.path(), vec![]).battery().unwrap();
        assert_eq!(snapshot, BatterySnapshot::new(100, -1));
    }

    #[test]
    fn test_battery_garbage_level_is_unknown() {
        let tmp = TempDir::new().unwrap();
        supply(tmp.path(), "battery", "Battery", &[("capacity", "n/a\n")]);

        let snapshot = provider(tmp.path(), vec![]).battery().unwrap();
        assert_eq!(snapshot, BatterySnapshot::new(-1, 100));
        assert_eq!(snapshot.percentage(), -1.0);
    }

    #[test]
    fn test_battery_named_supply() {
        let tmp = TempDir::new().unwrap();
        supply(tmp.path(), "BAT0", "Battery", &[("capacity", "10\n")]);
        supply(tmp.path(), "BAT1", "Battery", &[("capacity", "90\n")]);

        let mut provider = provider(tmp.path(), vec![]);
        assert_eq!(provider.battery().unwrap().level, 10);

        provider.config.battery_name = Some("BAT1".to_string());
        assert_eq!(provider.battery().unwrap().level, 90);

        provider.config.battery_name = Some("BAT2".to_string());
        assert!(matches!(
            provider.battery(),
            Err(HalError::BatteryUnavailable(_))
        ));
    }

    #[test]
    fn test_battery_unavailable() {
        let tmp = TempDir::new().unwrap();
        supply(tmp.path(), "usb", "USB", &[("online", "0\n")]);

        let result = provider(tmp.path(), vec![]).battery();
        assert!(matches!(result, Err(HalError::BatteryUnavailable(_))));

        let result = provider(&tmp.path().join("missing"), vec![]).battery();
        assert!(matches!(result, Err(HalError::BatteryUnavailable(_))));
    }

    #[test]
    fn test_battery_without_charge_files() {
        let tmp = TempDir::new().unwrap();
        supply(tmp.path(), "battery", "Battery", &[("status", "Charging\n")]);

        let result = provider(tmp.path(), vec![]).battery();
        assert!(matches!(result, Err(HalError::BatteryQueryFailed(_))));
    }

    #[test]
    fn test_model_from_build_prop() {
        let tmp = TempDir::new().unwrap();
        let prop = tmp.path().join("build.prop");
        fs::write(
            &prop,
            "# begin build properties\nro.product.brand=google\nro.product.model=Pixel 6\n",
        )
        .unwrap();

        let provider = provider(
            tmp.path(),
            vec![ModelSource::BuildProp {
                path: prop,
                key: "ro.product.model".to_string(),
            }],
        );
        assert_eq!(provider.model().unwrap(), "Pixel 6");
    }

    #[test]
    fn test_model_device_tree_strips_nul_only() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("model");
        fs::write(&model, b"Anbernic RG353M \0").unwrap();

        let provider = provider(tmp.path(), vec![ModelSource::DeviceTree { path: model }]);
        assert_eq!(provider.model().unwrap(), "Anbernic RG353M ");
    }

    #[test]
    fn test_model_falls_through_sources() {
        let tmp = TempDir::new().unwrap();
        let prop = tmp.path().join("build.prop");
        fs::write(&prop, "ro.product.brand=generic\n").unwrap();
        let dmi = tmp.path().join("product_name");
        fs::write(&dmi, "ThinkPad X1 Carbon\n").unwrap();

        let provider = provider(
            tmp.path(),
            vec![
                ModelSource::BuildProp {
                    path: prop,
                    key: "ro.product.model".to_string(),
                },
                ModelSource::DeviceTree {
                    path: tmp.path().join("missing"),
                },
                ModelSource::File { path: dmi },
            ],
        );
        assert_eq!(provider.model().unwrap(), "ThinkPad X1 Carbon");
    }

    #[test]
    fn test_model_unavailable() {
        let tmp = TempDir::new().unwrap();
        let provider = provider(
            tmp.path(),
            vec![ModelSource::File {
                path: tmp.path().join("missing"),
            }],
        );
        assert!(matches!(
            provider.model(),
            Err(HalError::ModelQueryFailed(_))
        ));
    }

    #[test]
    fn test_parse_build_prop() {
        let contents = "#ro.product.model=Commented\nro.product.model=sdk_gphone64\n";
        assert_eq!(
            parse_build_prop(contents, "ro.product.model"),
            Some("sdk_gphone64".to_string())
        );
        assert_eq!(parse_build_prop(contents, "ro.product.name"), None);
    }

    #[test]
    fn test_parse_build_prop_trims_value() {
        let contents = "ro.product.model = Pixel 6 \r\nro.product.brand=google\n";
        assert_eq!(
            parse_build_prop(contents, "ro.product.model"),
            Some("Pixel 6".to_string())
        );
    }
}
