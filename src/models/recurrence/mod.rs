// Recurrence module
// Structured repeat rules as decoded from the event's recurrence data

use chrono::{DateTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::AlarmError;

/// Base frequency of a repeating event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatPeriod {
    Daily,
    Weekly,
    Monthly,
    Annually,
}

/// When a series stops producing occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EndCondition {
    Never,
    /// Stop after `times` occurrences; excluded dates still use up the count.
    Count { times: u32 },
    /// Stop once the series passes `date`. Inclusive for timed events; for
    /// all-day events `date` is the first day no longer included.
    UntilDate { date: DateTime<Utc> },
}

/// Kind of an RFC 5545 BYxxx filter attached to a repeat rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByRuleType {
    ByMinute,
    ByHour,
    ByDay,
    ByMonthDay,
    ByYearDay,
    ByWeekNo,
    ByMonth,
    BySetPos,
    Wkst,
}

impl ByRuleType {
    pub fn name(self) -> &'static str {
        match self {
            ByRuleType::ByMinute => "BYMINUTE",
            ByRuleType::ByHour => "BYHOUR",
            ByRuleType::ByDay => "BYDAY",
            ByRuleType::ByMonthDay => "BYMONTHDAY",
            ByRuleType::ByYearDay => "BYYEARDAY",
            ByRuleType::ByWeekNo => "BYWEEKNO",
            ByRuleType::ByMonth => "BYMONTH",
            ByRuleType::BySetPos => "BYSETPOS",
            ByRuleType::Wkst => "WKST",
        }
    }
}

/// A single by-rule, e.g. `{ByDay, "MO"}` or `{ByDay, "MO,WE,FR"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedRule {
    pub rule_type: ByRuleType,
    pub interval: String,
}

impl AdvancedRule {
    pub fn new(rule_type: ByRuleType, interval: impl Into<String>) -> Self {
        Self {
            rule_type,
            interval: interval.into(),
        }
    }

    pub fn by_day(days: impl Into<String>) -> Self {
        Self::new(ByRuleType::ByDay, days)
    }
}

/// Recurrence of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatRule {
    pub frequency: RepeatPeriod,
    pub interval: u32,
    pub time_zone: String,
    pub end_condition: EndCondition,
    #[serde(default)]
    pub excluded_dates: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub advanced_rules: Vec<AdvancedRule>,
}

impl RepeatRule {
    /// A rule repeating every `interval` periods forever, with no filters.
    pub fn new(frequency: RepeatPeriod, interval: u32, time_zone: impl Into<String>) -> Self {
        Self {
            frequency,
            interval,
            time_zone: time_zone.into(),
            end_condition: EndCondition::Never,
            excluded_dates: Vec::new(),
            advanced_rules: Vec::new(),
        }
    }

    pub fn with_end_condition(mut self, end_condition: EndCondition) -> Self {
        self.end_condition = end_condition;
        self
    }

    pub fn with_excluded_dates(mut self, dates: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        self.excluded_dates.extend(dates);
        self
    }

    pub fn with_advanced_rule(mut self, rule: AdvancedRule) -> Self {
        self.advanced_rules.push(rule);
        self
    }

    /// Resolve the rule's IANA zone.
    pub fn tz(&self) -> Result<Tz, AlarmError> {
        parse_time_zone(&self.time_zone)
    }

    /// Check the invariants the sequencer relies on.
    pub fn validate(&self) -> Result<(), AlarmError> {
        if self.interval < 1 {
            return Err(AlarmError::InvalidInterval(self.interval));
        }

        if let EndCondition::Count { times: 0 } = self.end_condition {
            return Err(AlarmError::InvalidCount);
        }

        self.tz()?;
        Ok(())
    }

    /// Whether any by-day filter is attached.
    pub fn has_by_day(&self) -> bool {
        self.advanced_rules
            .iter()
            .any(|rule| rule.rule_type == ByRuleType::ByDay)
    }
}

/// Parse an IANA time zone identifier such as `"Europe/Berlin"`.
pub fn parse_time_zone(name: &str) -> Result<Tz, AlarmError> {
    name.parse::<Tz>()
        .map_err(|_| AlarmError::UnknownTimeZone(name.to_string()))
}

/// Map an ISO weekday abbreviation to a weekday.
pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    match code {
        "SU" => Some(Weekday::Sun),
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        _ => None,
    }
}
