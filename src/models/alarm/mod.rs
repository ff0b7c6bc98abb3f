// Alarm module
// Reminder triggers, the alarm records handed to the planner, and planned occurrences

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AlarmError;
use crate::models::recurrence::RepeatRule;

/// Unit of an alarm trigger offset. Calendar-aware units (months, years) are
/// not valid for triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmIntervalUnit {
    Minute,
    Hour,
    Day,
    Week,
}

impl AlarmIntervalUnit {
    /// Fixed length of one unit in seconds.
    pub fn seconds(self) -> i64 {
        match self {
            AlarmIntervalUnit::Minute => 60,
            AlarmIntervalUnit::Hour => 3_600,
            AlarmIntervalUnit::Day => 86_400,
            AlarmIntervalUnit::Week => 604_800,
        }
    }

    fn code(self) -> char {
        match self {
            AlarmIntervalUnit::Minute => 'M',
            AlarmIntervalUnit::Hour => 'H',
            AlarmIntervalUnit::Day => 'D',
            AlarmIntervalUnit::Week => 'W',
        }
    }

    fn from_code(code: char) -> Option<Self> {
        match code {
            'M' => Some(AlarmIntervalUnit::Minute),
            'H' => Some(AlarmIntervalUnit::Hour),
            'D' => Some(AlarmIntervalUnit::Day),
            'W' => Some(AlarmIntervalUnit::Week),
            _ => None,
        }
    }
}

/// Offset before an event occurrence at which the alarm fires.
///
/// Written as a compact token: `<value><unit>`, e.g. `"5M"`, `"1H"`, `"2D"`, `"1W"`.
///
/// # Examples
/// ```
/// use calendar_alarms::{AlarmInterval, AlarmIntervalUnit};
///
/// let trigger: AlarmInterval = "15M".parse().unwrap();
/// assert_eq!(trigger, AlarmInterval::new(AlarmIntervalUnit::Minute, 15));
/// assert_eq!(trigger.to_string(), "15M");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AlarmInterval {
    pub unit: AlarmIntervalUnit,
    pub value: u32,
}

impl AlarmInterval {
    pub fn new(unit: AlarmIntervalUnit, value: u32) -> Self {
        Self { unit, value }
    }

    /// Length of the offset in seconds.
    pub fn seconds(&self) -> i64 {
        i64::from(self.value) * self.unit.seconds()
    }

    pub fn duration(&self) -> Duration {
        Duration::seconds(self.seconds())
    }
}

impl FromStr for AlarmInterval {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AlarmError::InvalidTrigger(s.to_string());

        let mut chars = s.chars();
        let unit = chars
            .next_back()
            .and_then(AlarmIntervalUnit::from_code)
            .ok_or_else(invalid)?;
        let digits = chars.as_str();

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let value = digits.parse::<u32>().map_err(|_| invalid())?;
        Ok(Self { unit, value })
    }
}

impl fmt::Display for AlarmInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.code())
    }
}

impl TryFrom<String> for AlarmInterval {
    type Error = AlarmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlarmInterval> for String {
    fn from(interval: AlarmInterval) -> Self {
        interval.to_string()
    }
}

/// One reminder configuration attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmInfo {
    pub alarm_identifier: String,
    pub trigger: AlarmInterval,
}

impl AlarmInfo {
    pub fn new(alarm_identifier: impl Into<String>, trigger: AlarmInterval) -> Self {
        Self {
            alarm_identifier: alarm_identifier.into(),
            trigger,
        }
    }
}

/// What the data source asks the device to do with an alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Create,
    Update,
    Delete,
}

/// An alarm together with the event data needed to plan it.
///
/// `event_start`/`event_end` of all-day events are UTC midnights whose date
/// fields carry the local calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmNotification {
    pub operation: OperationType,
    pub summary: String,
    pub event_start: DateTime<Utc>,
    pub event_end: DateTime<Utc>,
    pub alarm_info: AlarmInfo,
    pub repeat_rule: Option<RepeatRule>,
    pub user: String,
}

impl AlarmNotification {
    pub fn identifier(&self) -> &str {
        &self.alarm_info.alarm_identifier
    }

    pub fn trigger(&self) -> AlarmInterval {
        self.alarm_info.trigger
    }
}

/// A concrete point at which an alarm must fire.
///
/// `occurrence_number` counts base recurrence steps of the series from 1,
/// so filtered or excluded steps leave gaps rather than renumbering. The
/// single occurrence of a non-repeating event is number 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmOccurrence {
    pub occurrence_number: u32,
    pub event_occurrence_time: DateTime<Utc>,
    pub event_occurrence_end: DateTime<Utc>,
    pub alarm: Arc<AlarmNotification>,
}

impl AlarmOccurrence {
    /// Instant the notification fires: the occurrence start minus the trigger.
    pub fn alarm_time(&self) -> DateTime<Utc> {
        self.event_occurrence_time - self.alarm.trigger().duration()
    }
}
