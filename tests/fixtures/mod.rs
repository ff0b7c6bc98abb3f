// Test fixtures - reusable test data
// Provides consistent alarms and instants across all test files
#![allow(dead_code)]

use std::sync::Arc;

use calendar_alarms::{
    AlarmInfo, AlarmInterval, AlarmNotification, OperationType, RepeatPeriod, RepeatRule,
};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Sample instants for testing
pub mod dates {
    use super::*;

    /// Wall-clock time in `tz` as an instant. Panics on gap or ambiguous times.
    pub fn local(tz: Tz, y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        tz.with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    /// Wall-clock time in Berlin
    pub fn berlin(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        local(chrono_tz::Europe::Berlin, y, m, d, h, min)
    }

    /// UTC midnight, the representation of an all-day date
    pub fn utc_midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    /// Returns Apr 14, 2025 at 09:00 UTC, the default "now"
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 14, 9, 0, 0).unwrap()
    }
}

/// Sample repeat rules for testing
pub mod rules {
    use super::*;

    pub fn daily_berlin() -> RepeatRule {
        RepeatRule::new(RepeatPeriod::Daily, 1, "Europe/Berlin")
    }

    pub fn weekly_berlin() -> RepeatRule {
        RepeatRule::new(RepeatPeriod::Weekly, 1, "Europe/Berlin")
    }
}

/// Sample alarms for testing
pub mod alarms {
    use super::*;

    /// Alarm on a zero-length event at `start`
    pub fn alarm(
        identifier: &str,
        start: DateTime<Utc>,
        trigger: &str,
        repeat_rule: Option<RepeatRule>,
    ) -> AlarmNotification {
        alarm_spanning(identifier, start, start, trigger, repeat_rule)
    }

    pub fn alarm_spanning(
        identifier: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        trigger: &str,
        repeat_rule: Option<RepeatRule>,
    ) -> AlarmNotification {
        AlarmNotification {
            operation: OperationType::Create,
            summary: "summary".to_string(),
            event_start: start,
            event_end: end,
            alarm_info: AlarmInfo::new(identifier, trigger.parse::<AlarmInterval>().unwrap()),
            repeat_rule,
            user: "user".to_string(),
        }
    }

    pub fn shared(alarm: AlarmNotification) -> Arc<AlarmNotification> {
        Arc::new(alarm)
    }
}
