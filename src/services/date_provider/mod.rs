//! Source of the current instant and the host time zone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::models::recurrence::parse_time_zone;
use crate::models::settings::PlannerSettings;

#[cfg_attr(test, mockall::automock)]
pub trait DateProvider {
    fn now(&self) -> DateTime<Utc>;
    fn time_zone(&self) -> Tz;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemDateProvider {
    time_zone: Tz,
}

impl SystemDateProvider {
    pub fn new(time_zone: Tz) -> Self {
        Self { time_zone }
    }

    /// Host zone from settings, then the `TZ` environment variable, then UTC.
    pub fn from_settings(settings: &PlannerSettings) -> Self {
        let time_zone = settings
            .tz()
            .or_else(|| {
                std::env::var("TZ")
                    .ok()
                    .and_then(|zone| parse_time_zone(zone.trim_start_matches(':')).ok())
            })
            .unwrap_or(Tz::UTC);

        log::debug!("Using host time zone {}", time_zone);
        Self { time_zone }
    }
}

impl Default for SystemDateProvider {
    fn default() -> Self {
        Self::from_settings(&PlannerSettings::default())
    }
}

impl DateProvider for SystemDateProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn time_zone(&self) -> Tz {
        self.time_zone
    }
}

/// Always reports the same instant; for deterministic planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDateProvider {
    pub now: DateTime<Utc>,
    pub time_zone: Tz,
}

impl FixedDateProvider {
    pub fn new(now: DateTime<Utc>, time_zone: Tz) -> Self {
        Self { now, time_zone }
    }
}

impl DateProvider for FixedDateProvider {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn time_zone(&self) -> Tz {
        self.time_zone
    }
}

impl<P: DateProvider + ?Sized> DateProvider for &P {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn time_zone(&self) -> Tz {
        (**self).time_zone()
    }
}
