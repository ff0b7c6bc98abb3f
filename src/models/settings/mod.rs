// Settings module
// Planner limits and host time zone, loaded from TOML

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::AlarmError;
use crate::models::recurrence::parse_time_zone;

/// Default number of future occurrences planned per alarm.
pub const DEFAULT_PER_ALARM_LIMIT: usize = 24;
/// Default number of occurrences planned across all alarms. Mobile platforms
/// keep at most 64 pending local notifications per app.
pub const DEFAULT_OVERALL_LIMIT: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub per_alarm_limit: usize,
    pub overall_limit: usize,
    /// IANA identifier of the host zone; falls back to `TZ`, then UTC.
    pub time_zone: Option<String>,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            per_alarm_limit: DEFAULT_PER_ALARM_LIMIT,
            overall_limit: DEFAULT_OVERALL_LIMIT,
            time_zone: None,
        }
    }
}

impl PlannerSettings {
    /// Parse settings from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn validate(&self) -> Result<(), AlarmError> {
        if self.per_alarm_limit == 0 || self.overall_limit == 0 {
            return Err(AlarmError::InvalidLimit);
        }

        if let Some(ref zone) = self.time_zone {
            parse_time_zone(zone)?;
        }

        Ok(())
    }

    /// The configured host zone, if one is set and valid.
    pub fn tz(&self) -> Option<Tz> {
        self.time_zone
            .as_deref()
            .and_then(|zone| parse_time_zone(zone).ok())
    }
}
