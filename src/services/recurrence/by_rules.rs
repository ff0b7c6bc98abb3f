use chrono::Weekday;

use crate::error::AlarmError;
use crate::models::recurrence::{weekday_from_code, AdvancedRule, ByRuleType};

/// Weekdays selected by the BYDAY rules of a repeat rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct WeekdaySet(u8);

impl WeekdaySet {
    pub(crate) fn insert(&mut self, weekday: Weekday) {
        self.0 |= 1 << weekday.num_days_from_monday();
    }

    pub(crate) fn contains(&self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday.num_days_from_monday()) != 0
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Collect the BYDAY filter of `rules`.
///
/// Returns `Ok(None)` when no BYDAY rule is present. Values may be single codes
/// (`"MO"`) or comma-joined (`"MO,TU"`). Rule types the sequencer cannot apply
/// are skipped with a warning.
pub(crate) fn parse_by_day(rules: &[AdvancedRule]) -> Result<Option<WeekdaySet>, AlarmError> {
    let mut weekdays = WeekdaySet::default();
    let mut has_by_day = false;

    for rule in rules {
        if rule.rule_type != ByRuleType::ByDay {
            log::warn!(
                "Ignoring unsupported {} rule '{}'",
                rule.rule_type.name(),
                rule.interval
            );
            continue;
        }

        has_by_day = true;
        for code in rule.interval.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            let weekday = weekday_from_code(code).ok_or_else(|| AlarmError::InvalidByRule {
                rule: rule.rule_type.name().to_string(),
                value: code.to_string(),
            })?;
            weekdays.insert(weekday);
        }
    }

    if !has_by_day {
        return Ok(None);
    }

    if weekdays.is_empty() {
        return Err(AlarmError::EmptyByDay);
    }

    Ok(Some(weekdays))
}
