//! Alarm occurrence planning.
//!
//! Turns alarms attached to (possibly repeating) events into the concrete
//! instants their notifications must fire at, capped per alarm and overall.

use std::iter::FusedIterator;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::AlarmError;
use crate::models::alarm::{AlarmNotification, AlarmOccurrence};
use crate::services::date_provider::DateProvider;
use crate::services::recurrence::{EventOccurrence, EventOccurrences};

mod planner;

pub use planner::plan_future_occurrences;

#[derive(Debug, Clone)]
enum OccurrenceSource {
    Single(Option<EventOccurrence>),
    Repeating(EventOccurrences),
}

impl Iterator for OccurrenceSource {
    type Item = EventOccurrence;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            OccurrenceSource::Single(occurrence) => occurrence.take(),
            OccurrenceSource::Repeating(occurrences) => occurrences.next(),
        }
    }
}

/// Occurrences of one alarm whose fire time is not before `now`, in order.
///
/// Unbounded for never-ending series; the caller decides how many to take.
#[derive(Debug, Clone)]
pub struct FutureAlarmOccurrences {
    alarm: Arc<AlarmNotification>,
    source: OccurrenceSource,
    now: DateTime<Utc>,
}

impl FutureAlarmOccurrences {
    /// Build the sequence for `alarm`. All-day occurrences are placed on
    /// local midnights of `local_tz`.
    pub fn new(
        alarm: Arc<AlarmNotification>,
        now: DateTime<Utc>,
        local_tz: Tz,
    ) -> Result<Self, AlarmError> {
        let source = match alarm.repeat_rule {
            Some(ref rule) => OccurrenceSource::Repeating(EventOccurrences::new(
                alarm.event_start,
                alarm.event_end,
                rule,
                local_tz,
            )?),
            None => OccurrenceSource::Single(Some(EventOccurrence {
                occurrence_number: 0,
                start: alarm.event_start,
                end: alarm.event_end,
            })),
        };

        Ok(Self { alarm, source, now })
    }

    pub fn alarm(&self) -> &Arc<AlarmNotification> {
        &self.alarm
    }
}

impl Iterator for FutureAlarmOccurrences {
    type Item = AlarmOccurrence;

    fn next(&mut self) -> Option<Self::Item> {
        let trigger = self.alarm.trigger().duration();

        loop {
            let occurrence = self.source.next()?;
            if occurrence.start - trigger < self.now {
                continue;
            }

            return Some(AlarmOccurrence {
                occurrence_number: occurrence.occurrence_number,
                event_occurrence_time: occurrence.start,
                event_occurrence_end: occurrence.end,
                alarm: Arc::clone(&self.alarm),
            });
        }
    }
}

impl FusedIterator for FutureAlarmOccurrences {}

/// Plans alarm occurrences against the clock and zone of a [`DateProvider`].
#[derive(Debug, Clone)]
pub struct AlarmModel<P> {
    date_provider: P,
}

impl<P: DateProvider> AlarmModel<P> {
    pub fn new(date_provider: P) -> Self {
        Self { date_provider }
    }

    /// Future occurrences of a single alarm, bounded only by its end condition.
    pub fn future_alarm_occurrences_sequence(
        &self,
        alarm: Arc<AlarmNotification>,
    ) -> Result<FutureAlarmOccurrences, AlarmError> {
        FutureAlarmOccurrences::new(
            alarm,
            self.date_provider.now(),
            self.date_provider.time_zone(),
        )
    }

    /// Round-robin plan across `alarms` at the provider's current instant.
    ///
    /// See [`plan_future_occurrences`].
    pub fn future_occurrences(
        &self,
        alarms: &[Arc<AlarmNotification>],
        up_to_for_each: usize,
        up_to_overall: usize,
    ) -> Result<Vec<AlarmOccurrence>, AlarmError> {
        self.future_occurrences_at(
            alarms,
            up_to_for_each,
            up_to_overall,
            self.date_provider.now(),
        )
    }

    /// Round-robin plan across `alarms` as seen from `now`.
    pub fn future_occurrences_at(
        &self,
        alarms: &[Arc<AlarmNotification>],
        up_to_for_each: usize,
        up_to_overall: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<AlarmOccurrence>, AlarmError> {
        plan_future_occurrences(
            alarms,
            up_to_for_each,
            up_to_overall,
            now,
            self.date_provider.time_zone(),
        )
    }
}
