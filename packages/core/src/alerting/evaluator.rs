//! Alert trigger evaluation

use crate::alerting::types::{SecurityStatusRecord, Trigger};

pub const DEFAULT_REPORTABLE_AQS: [&str; 2] = ["High", "Danger"];

const PIR_TRIGGER: &str = "Detected";
const MAGNET_TRIGGER: &str = "Open";
const SOUND_TRIGGER: &str = "Above";

/// Decides whether a security status record warrants an alert.
///
/// The four checks are independent; none takes precedence over another.
#[derive(Debug, Clone)]
pub struct AlertEvaluator {
    reportable_aqs: Vec<String>,
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_REPORTABLE_AQS.iter().map(|s| s.to_string()).collect())
    }
}

impl AlertEvaluator {
    pub fn new(reportable_aqs: Vec<String>) -> Self {
        Self { reportable_aqs }
    }

    /// True when at least one trigger matches. An absent record never reports.
    pub fn should_report(&self, record: Option<&SecurityStatusRecord>) -> bool {
        let Some(record) = record else {
            return false;
        };

        record
            .aqs
            .as_deref()
            .is_some_and(|aqs| self.is_reportable_aqs(aqs))
            || record.pir.as_deref() == Some(PIR_TRIGGER)
            || record.magnet.as_deref() == Some(MAGNET_TRIGGER)
            || record.sound.as_deref() == Some(SOUND_TRIGGER)
    }

    /// Every matching trigger, in field order.
    pub fn triggers(&self, record: Option<&SecurityStatusRecord>) -> Vec<Trigger> {
        let mut triggers = Vec::new();
        let Some(record) = record else {
            return triggers;
        };

        if let Some(level) = record.aqs_level() {
            if self.is_reportable_aqs(level.as_str()) {
                triggers.push(Trigger::AirQuality(level));
            }
        }
        if record.pir.as_deref() == Some(PIR_TRIGGER) {
            triggers.push(Trigger::MotionDetected);
        }
        if record.magnet.as_deref() == Some(MAGNET_TRIGGER) {
            triggers.push(Trigger::ContactOpen);
        }
        if record.sound.as_deref() == Some(SOUND_TRIGGER) {
            triggers.push(Trigger::SoundAbove);
        }

        triggers
    }

    fn is_reportable_aqs(&self, aqs: &str) -> bool {
        self.reportable_aqs.iter().any(|level| level == aqs)
    }
}

/// Evaluate with the default trigger set.
pub fn should_report(record: Option<&SecurityStatusRecord>) -> bool {
    AlertEvaluator::default().should_report(record)
}
