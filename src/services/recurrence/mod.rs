//! Lazy expansion of a repeating event into its occurrences.
//!
//! [`EventOccurrences`] is a pull-based iterator: each call to `next` advances
//! the cursor just far enough to find the next occurrence, so never-ending
//! series cost nothing beyond what the caller consumes.

use std::collections::BTreeSet;
use std::iter::FusedIterator;

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::AlarmError;
use crate::models::recurrence::{EndCondition, RepeatPeriod, RepeatRule};

mod by_rules;
pub mod date_math;

use by_rules::{parse_by_day, WeekdaySet};
use date_math::{
    add_days, advance, all_day_date_local, days_between, is_all_day_event, period_index,
    period_start,
};

/// Consecutive days a BYDAY filter may reject before the series is abandoned.
const MAX_FILTERED_DAYS: u32 = 1000;

/// One concrete instance of a repeating event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOccurrence {
    /// Base step of the series this occurrence sits on, counted from 1, so
    /// the last occurrence of a `count(N)` series is number N.
    pub occurrence_number: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
enum EventLength {
    Timed(Duration),
    AllDay(u64),
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    tick: u32,
    instant: DateTime<Utc>,
    selected: bool,
}

/// Iterator over the occurrences of one repeating event.
///
/// Timed events are stepped on the wall clock of the rule's zone. All-day
/// events are stepped in UTC on their UTC-midnight dates and handed out as
/// local midnights of `local_tz`.
#[derive(Debug, Clone)]
pub struct EventOccurrences {
    series_start: DateTime<Utc>,
    start_date: NaiveDate,
    frequency: RepeatPeriod,
    interval: u32,
    frame_tz: Tz,
    local_tz: Tz,
    all_day: bool,
    length: EventLength,
    end_condition: EndCondition,
    excluded_dates: BTreeSet<DateTime<Utc>>,
    by_day: Option<WeekdaySet>,
    tick: u32,
    counted: u32,
    finished: bool,
}

impl EventOccurrences {
    /// Build the sequence for an event spanning `event_start..event_end`.
    ///
    /// Fails on an invalid rule: interval below 1, a zero count, an unknown
    /// zone, or a BYDAY rule without valid weekdays.
    pub fn new(
        event_start: DateTime<Utc>,
        event_end: DateTime<Utc>,
        rule: &RepeatRule,
        local_tz: Tz,
    ) -> Result<Self, AlarmError> {
        rule.validate()?;
        let rule_tz = rule.tz()?;
        let by_day = parse_by_day(&rule.advanced_rules)?;

        let all_day = is_all_day_event(event_start, event_end);
        let (frame_tz, length) = if all_day {
            let days = days_between(event_start, event_end, Tz::UTC).max(0);
            (Tz::UTC, EventLength::AllDay(days.unsigned_abs()))
        } else {
            (rule_tz, EventLength::Timed(event_end - event_start))
        };

        log::debug!(
            "Expanding {:?} series from {} every {} (all-day: {}, zone: {})",
            rule.frequency,
            event_start,
            rule.interval,
            all_day,
            frame_tz
        );

        Ok(Self {
            series_start: event_start,
            start_date: event_start.with_timezone(&frame_tz).date_naive(),
            frequency: rule.frequency,
            interval: rule.interval,
            frame_tz,
            local_tz,
            all_day,
            length,
            end_condition: rule.end_condition.clone(),
            excluded_dates: rule.excluded_dates.iter().copied().collect(),
            by_day,
            tick: 0,
            counted: 0,
            finished: false,
        })
    }

    pub fn is_all_day(&self) -> bool {
        self.all_day
    }

    /// The next base step at or after the cursor.
    fn next_candidate(&mut self) -> Option<Candidate> {
        let Some(by_day) = self.by_day else {
            let amount = self.tick.checked_mul(self.interval)?;
            let instant = advance(self.series_start, self.frequency, amount, self.frame_tz)?;
            return Some(Candidate {
                tick: self.tick,
                instant,
                selected: true,
            });
        };

        // the series start always counts, whatever its weekday
        if self.tick == 0 {
            return Some(Candidate {
                tick: 0,
                instant: self.series_start,
                selected: true,
            });
        }

        let date = self.start_date.checked_add_days(Days::new(u64::from(self.tick)))?;
        let index = period_index(self.start_date, date, self.frequency);
        let interval = i64::from(self.interval);

        let date = if index % interval == 0 {
            date
        } else {
            let next_index = u32::try_from((index / interval + 1) * interval).ok()?;
            let next_start = period_start(self.start_date, next_index, self.frequency)?;
            self.tick = u32::try_from((next_start - self.start_date).num_days()).ok()?;
            next_start
        };

        let instant = add_days(self.series_start, u64::from(self.tick), self.frame_tz)?;
        Some(Candidate {
            tick: self.tick,
            instant,
            selected: by_day.contains(date.weekday()),
        })
    }

    fn is_past_end(&self, instant: DateTime<Utc>) -> bool {
        match self.end_condition {
            EndCondition::UntilDate { date } if self.all_day => instant >= date,
            EndCondition::UntilDate { date } => instant > date,
            _ => false,
        }
    }

    fn count_exhausted(&self) -> bool {
        matches!(self.end_condition, EndCondition::Count { times } if self.counted >= times)
    }

    fn occurrence(&self, occurrence_number: u32, instant: DateTime<Utc>) -> Option<EventOccurrence> {
        let (start, end) = match self.length {
            EventLength::Timed(duration) => (instant, instant.checked_add_signed(duration)?),
            EventLength::AllDay(days) => {
                let end_date = instant.checked_add_days(Days::new(days))?;
                (
                    all_day_date_local(instant, self.local_tz),
                    all_day_date_local(end_date, self.local_tz),
                )
            }
        };

        Some(EventOccurrence {
            occurrence_number,
            start,
            end,
        })
    }

    fn finish(&mut self) -> Option<EventOccurrence> {
        self.finished = true;
        None
    }
}

impl Iterator for EventOccurrences {
    type Item = EventOccurrence;

    fn next(&mut self) -> Option<Self::Item> {
        let mut filtered = 0u32;

        while !self.finished {
            let Some(candidate) = self.next_candidate() else {
                return self.finish();
            };

            if self.is_past_end(candidate.instant) {
                return self.finish();
            }

            let Some(next_tick) = candidate.tick.checked_add(1) else {
                return self.finish();
            };
            self.tick = next_tick;

            if !candidate.selected {
                filtered += 1;
                if filtered >= MAX_FILTERED_DAYS {
                    log::warn!(
                        "BYDAY filter matched nothing in {} days after {}, ending series",
                        MAX_FILTERED_DAYS,
                        candidate.instant
                    );
                    return self.finish();
                }
                continue;
            }
            filtered = 0;

            if self.count_exhausted() {
                return self.finish();
            }
            self.counted += 1;

            if self.excluded_dates.contains(&candidate.instant) {
                continue;
            }

            return match self.occurrence(next_tick, candidate.instant) {
                Some(occurrence) => Some(occurrence),
                None => self.finish(),
            };
        }

        None
    }
}

impl FusedIterator for EventOccurrences {}
