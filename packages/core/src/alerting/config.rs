//! Configuration for a security alert job

use std::str::FromStr;

pub const DEFAULT_DEVICE_ID: &str = "muon_0";
pub const DEFAULT_PRODUCT_ID: &str = "muon";
pub const DEFAULT_LEDGER_NAME: &str = "security-status";
pub const DEFAULT_EVENT_NAME: &str = "SEC_ALERT";
pub const DEFAULT_PAYLOAD_LITERAL: &str = "Security alert";

/// What the published event carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PayloadMode {
    /// Compact JSON of the ledger record.
    #[default]
    Serialized,
    /// A fixed string, independent of the record.
    Literal(String),
}

impl PayloadMode {
    /// Build from a mode name and the literal text used when the mode is `literal`.
    pub fn from_parts(mode: &str, literal: Option<String>) -> Result<Self, String> {
        match mode.parse::<PayloadModeKind>()? {
            PayloadModeKind::Serialized => Ok(Self::Serialized),
            PayloadModeKind::Literal => Ok(Self::Literal(
                literal.unwrap_or_else(|| DEFAULT_PAYLOAD_LITERAL.to_string()),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadModeKind {
    Serialized,
    Literal,
}

impl FromStr for PayloadModeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serialized" => Ok(Self::Serialized),
            "literal" => Ok(Self::Literal),
            other => Err(format!("Invalid PAYLOAD_MODE: {}", other)),
        }
    }
}

/// Everything a single job run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub device_id: String,
    pub product_id: String,
    pub ledger_name: String,
    pub event_name: String,
    pub payload_mode: PayloadMode,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            device_id: DEFAULT_DEVICE_ID.to_string(),
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            ledger_name: DEFAULT_LEDGER_NAME.to_string(),
            event_name: DEFAULT_EVENT_NAME.to_string(),
            payload_mode: PayloadMode::default(),
        }
    }
}
