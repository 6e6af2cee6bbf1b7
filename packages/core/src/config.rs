use std::env;

use crate::alerting::config::{
    AlertConfig, PayloadMode, DEFAULT_DEVICE_ID, DEFAULT_EVENT_NAME, DEFAULT_LEDGER_NAME,
    DEFAULT_PRODUCT_ID,
};
use crate::cli::Cli;
use crate::services::particle::DEFAULT_API_URL;

pub const DEFAULT_INTERVAL_SECONDS: u64 = 60;

#[derive(Clone)]
pub struct Config {
    pub api_url: String,
    pub access_token: String,
    pub alert: AlertConfig,
    pub interval_seconds: u64,
}

// Keeps the access token out of startup logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("access_token", &"<redacted>")
            .field("alert", &self.alert)
            .field("interval_seconds", &self.interval_seconds)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let access_token = lookup("PARTICLE_ACCESS_TOKEN")
            .filter(|token| !token.is_empty())
            .ok_or("PARTICLE_ACCESS_TOKEN is required")?;

        let api_url = lookup("PARTICLE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let payload_mode = PayloadMode::from_parts(
            &lookup("PAYLOAD_MODE").unwrap_or_else(|| "serialized".to_string()),
            lookup("PAYLOAD_LITERAL"),
        )?;

        let interval_seconds = match lookup("SCHEDULE_INTERVAL_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| "SCHEDULE_INTERVAL_SECONDS must be a valid number")?,
            None => DEFAULT_INTERVAL_SECONDS,
        };
        if interval_seconds == 0 {
            return Err("SCHEDULE_INTERVAL_SECONDS must be greater than zero".to_string());
        }

        let alert = AlertConfig {
            device_id: lookup("DEVICE_ID").unwrap_or_else(|| DEFAULT_DEVICE_ID.to_string()),
            product_id: lookup("PRODUCT_ID").unwrap_or_else(|| DEFAULT_PRODUCT_ID.to_string()),
            ledger_name: lookup("LEDGER_NAME").unwrap_or_else(|| DEFAULT_LEDGER_NAME.to_string()),
            event_name: lookup("EVENT_NAME").unwrap_or_else(|| DEFAULT_EVENT_NAME.to_string()),
            payload_mode,
        };

        Ok(Self {
            api_url,
            access_token,
            alert,
            interval_seconds,
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn apply_cli(mut self, cli: &Cli) -> Result<Self, String> {
        if let Some(url) = &cli.api_url {
            self.api_url = url.clone();
        }
        if let Some(device_id) = &cli.device_id {
            self.alert.device_id = device_id.clone();
        }
        if let Some(product_id) = &cli.product_id {
            self.alert.product_id = product_id.clone();
        }
        if let Some(mode) = &cli.payload_mode {
            let literal = cli.payload_literal.clone().or_else(|| match &self.alert.payload_mode {
                PayloadMode::Literal(text) => Some(text.clone()),
                PayloadMode::Serialized => None,
            });
            self.alert.payload_mode = PayloadMode::from_parts(mode, literal)?;
        } else if let Some(text) = &cli.payload_literal {
            if self.alert.payload_mode == PayloadMode::Serialized {
                return Err(
                    "--payload-literal needs literal payload mode (--payload-mode literal or PAYLOAD_MODE=literal)"
                        .to_string(),
                );
            }
            self.alert.payload_mode = PayloadMode::Literal(text.clone());
        }
        if let Some(interval) = cli.interval {
            if interval == 0 {
                return Err("--interval must be greater than zero".to_string());
            }
            self.interval_seconds = interval;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = Config::from_lookup(lookup_from(&[("PARTICLE_ACCESS_TOKEN", "tok")])).unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.alert.device_id, "muon_0");
        assert_eq!(config.alert.product_id, "muon");
        assert_eq!(config.alert.ledger_name, "security-status");
        assert_eq!(config.alert.event_name, "SEC_ALERT");
        assert_eq!(config.alert.payload_mode, PayloadMode::Serialized);
        assert_eq!(config.interval_seconds, DEFAULT_INTERVAL_SECONDS);
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.contains("PARTICLE_ACCESS_TOKEN"));
    }

    #[test]
    fn literal_payload_mode_from_env() {
        let config = Config::from_lookup(lookup_from(&[
            ("PARTICLE_ACCESS_TOKEN", "tok"),
            ("PAYLOAD_MODE", "literal"),
            ("PAYLOAD_LITERAL", "Intrusion"),
        ]))
        .unwrap();

        assert_eq!(config.alert.payload_mode, PayloadMode::Literal("Intrusion".into()));
    }

    #[test]
    fn invalid_interval_is_rejected() {
        let zero = Config::from_lookup(lookup_from(&[
            ("PARTICLE_ACCESS_TOKEN", "tok"),
            ("SCHEDULE_INTERVAL_SECONDS", "0"),
        ]));
        let garbage = Config::from_lookup(lookup_from(&[
            ("PARTICLE_ACCESS_TOKEN", "tok"),
            ("SCHEDULE_INTERVAL_SECONDS", "soon"),
        ]));

        assert!(zero.is_err());
        assert!(garbage.is_err());
    }

    #[test]
    fn cli_overrides_env() {
        let config = Config::from_lookup(lookup_from(&[("PARTICLE_ACCESS_TOKEN", "tok")])).unwrap();
        let cli = Cli::parse_from([
            "security-alert-job",
            "--device-id",
            "muon_3",
            "--payload-mode",
            "literal",
            "--payload-literal",
            "Alarm",
            "--interval",
            "30",
        ]);

        let config = config.apply_cli(&cli).unwrap();

        assert_eq!(config.alert.device_id, "muon_3");
        assert_eq!(config.alert.payload_mode, PayloadMode::Literal("Alarm".into()));
        assert_eq!(config.interval_seconds, 30);
    }

    #[test]
    fn literal_text_without_literal_mode_is_rejected() {
        let config = Config::from_lookup(lookup_from(&[("PARTICLE_ACCESS_TOKEN", "tok")])).unwrap();
        let cli = Cli::parse_from(["security-alert-job", "--payload-literal", "Alarm"]);

        let err = config.apply_cli(&cli).unwrap_err();

        assert!(err.contains("--payload-literal"));
    }

    #[test]
    fn literal_text_replaces_env_literal() {
        let config = Config::from_lookup(lookup_from(&[
            ("PARTICLE_ACCESS_TOKEN", "tok"),
            ("PAYLOAD_MODE", "literal"),
        ]))
        .unwrap();
        let cli = Cli::parse_from(["security-alert-job", "--payload-literal", "Alarm"]);

        let config = config.apply_cli(&cli).unwrap();

        assert_eq!(config.alert.payload_mode, PayloadMode::Literal("Alarm".into()));
    }

    #[test]
    fn debug_output_hides_token() {
        let config = Config::from_lookup(lookup_from(&[("PARTICLE_ACCESS_TOKEN", "secret")])).unwrap();
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
