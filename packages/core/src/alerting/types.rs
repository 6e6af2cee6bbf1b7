//! Core data types for security status alerting

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Latest security status for one device, as stored in the ledger.
///
/// Every typed field is optional. A field of the wrong JSON type is treated
/// as absent instead of failing the whole record. `raw` keeps the ledger data
/// exactly as fetched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SecurityStatusRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub aqs: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub pir: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub magnet: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub sound: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub loc: Option<Location>,

    #[serde(skip)]
    pub raw: Value,
}

impl SecurityStatusRecord {
    /// Parse ledger data. Never fails; non-object data yields a record
    /// with no typed fields.
    pub fn from_value(value: Value) -> Self {
        let mut record: Self = serde_json::from_value(value.clone()).unwrap_or_default();
        record.raw = value;
        record
    }

    pub fn aqs_level(&self) -> Option<AqsLevel> {
        self.aqs.as_deref().map(AqsLevel::parse)
    }
}

/// GNSS fix attached by the central device when it has a position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// Air quality levels reported by the sensor node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AqsLevel {
    None,
    Fresh,
    Low,
    High,
    Danger,
    Error,
    Other(String),
}

impl AqsLevel {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "None" => Self::None,
            "Fresh" => Self::Fresh,
            "Low" => Self::Low,
            "High" => Self::High,
            "Danger" => Self::Danger,
            "Error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "None",
            Self::Fresh => "Fresh",
            Self::Low => "Low",
            Self::High => "High",
            Self::Danger => "Danger",
            Self::Error => "Error",
            Self::Other(raw) => raw,
        }
    }
}

/// A single condition that made a record reportable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    AirQuality(AqsLevel),
    MotionDetected,
    ContactOpen,
    SoundAbove,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trigger::AirQuality(level) => write!(f, "aqs={}", level.as_str()),
            Trigger::MotionDetected => write!(f, "pir=Detected"),
            Trigger::ContactOpen => write!(f, "magnet=Open"),
            Trigger::SoundAbove => write!(f, "sound=Above"),
        }
    }
}

/// Result of a single job run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The ledger held no record for the device.
    NoData,
    /// A record was read but nothing matched.
    Quiet,
    /// An alert event was published.
    Published { triggers: Vec<Trigger> },
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
