use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::AlarmError;
use crate::models::alarm::{AlarmNotification, AlarmOccurrence};

use super::FutureAlarmOccurrences;

/// Plan future alarm occurrences across several alarms.
///
/// Each round takes the next future occurrence of every alarm that still has
/// one, in input order, so earlier alarms win ties for the last slots. An
/// alarm drops out after `up_to_for_each` occurrences or when its series ends.
/// Planning stops once `up_to_overall` occurrences are collected.
///
/// The result is ordered by round, not globally by time. Any invalid alarm
/// rejects the whole plan.
pub fn plan_future_occurrences(
    alarms: &[Arc<AlarmNotification>],
    up_to_for_each: usize,
    up_to_overall: usize,
    now: DateTime<Utc>,
    local_tz: Tz,
) -> Result<Vec<AlarmOccurrence>, AlarmError> {
    let mut sources = alarms
        .iter()
        .map(|alarm| {
            FutureAlarmOccurrences::new(Arc::clone(alarm), now, local_tz)
                .map(|occurrences| occurrences.take(up_to_for_each))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let capacity = up_to_overall.min(alarms.len().saturating_mul(up_to_for_each));
    let mut planned = Vec::with_capacity(capacity);

    while !sources.is_empty() && planned.len() < up_to_overall {
        sources.retain_mut(|source| {
            if planned.len() >= up_to_overall {
                return true;
            }

            match source.next() {
                Some(occurrence) => {
                    planned.push(occurrence);
                    true
                }
                None => false,
            }
        });
    }

    log::debug!(
        "Planned {} alarm occurrences across {} alarms",
        planned.len(),
        alarms.len()
    );

    Ok(planned)
}
