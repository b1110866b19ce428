//! Values handed back to the scripting layer

use serde::{Deserialize, Serialize};

/// Snapshot returned by `getDeviceInfo`.
///
/// JSON has no literal for the non-finite levels a zero or unknown scale
/// produces, so those travel as the strings `"Infinity"`, `"-Infinity"` and
/// `"NaN"`, matching JavaScript's `Number()` spellings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfoResult {
    /// Charge percentage, `level * 100 / scale`
    #[serde(with = "battery_level")]
    pub battery_level: f64,
    /// Model string exactly as the OS reported it
    pub device_model: String,
}

mod battery_level {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) => match s.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid battery level: {}", other))),
            },
        }
    }
}
