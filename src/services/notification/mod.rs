//! Hand-off of planned alarm occurrences to a platform notification scheduler.
//!
//! Every occurrence gets a stable identifier derived from its alarm and
//! occurrence number, so re-planning never duplicates a visible notification.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::models::alarm::{AlarmNotification, AlarmOccurrence, OperationType};
use crate::models::settings::PlannerSettings;
use crate::services::alarm::AlarmModel;
use crate::services::date_provider::DateProvider;

/// Stable identifier of one planned occurrence of an alarm.
pub fn notification_identifier(alarm_identifier: &str, occurrence_number: u32) -> String {
    format!("{}#{}", alarm_identifier, occurrence_number)
}

/// A notification as handed to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledNotification {
    pub id: String,
    pub alarm_identifier: String,
    pub occurrence_number: u32,
    pub fire_at: DateTime<Utc>,
    pub event_time: DateTime<Utc>,
    pub summary: String,
    pub user: String,
}

impl From<&AlarmOccurrence> for ScheduledNotification {
    fn from(occurrence: &AlarmOccurrence) -> Self {
        let alarm = &occurrence.alarm;
        Self {
            id: notification_identifier(alarm.identifier(), occurrence.occurrence_number),
            alarm_identifier: alarm.identifier().to_string(),
            occurrence_number: occurrence.occurrence_number,
            fire_at: occurrence.alarm_time(),
            event_time: occurrence.event_occurrence_time,
            summary: alarm.summary.clone(),
            user: alarm.user.clone(),
        }
    }
}

/// Platform side of notification scheduling.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationScheduler {
    /// Schedule or replace the notification with `notification.id`.
    fn schedule(&mut self, notification: &ScheduledNotification) -> Result<()>;

    fn cancel(&mut self, notification_id: &str) -> Result<()>;
}

/// Outcome of one scheduling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub scheduled: usize,
    pub unchanged: usize,
    pub cancelled: usize,
}

/// Keeps the platform's pending notifications in line with the current alarms.
pub struct NotificationService<P, S> {
    model: AlarmModel<P>,
    scheduler: S,
    settings: PlannerSettings,
    alarms: Vec<Arc<AlarmNotification>>,
    scheduled: BTreeMap<String, ScheduledNotification>,
    enabled: bool,
}

impl<P: DateProvider, S: NotificationScheduler> NotificationService<P, S> {
    pub fn new(date_provider: P, scheduler: S, settings: PlannerSettings) -> Result<Self> {
        settings.validate().context("Invalid planner settings")?;

        Ok(Self {
            model: AlarmModel::new(date_provider),
            scheduler,
            settings,
            alarms: Vec::new(),
            scheduled: BTreeMap::new(),
            enabled: true,
        })
    }

    /// Check if notifications are enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable notifications. Takes effect on the next reschedule.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Alarms currently known, in the order they were created.
    pub fn alarms(&self) -> &[Arc<AlarmNotification>] {
        &self.alarms
    }

    /// Notifications currently handed to the platform, by identifier.
    pub fn scheduled(&self) -> &BTreeMap<String, ScheduledNotification> {
        &self.scheduled
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Apply create, update and delete operations, then reschedule.
    ///
    /// The batch is planned before it is stored, so a batch with an invalid
    /// alarm is rejected as a whole and leaves the known alarms untouched.
    pub fn apply<I>(&mut self, notifications: I) -> Result<ScheduleSummary>
    where
        I: IntoIterator<Item = AlarmNotification>,
    {
        let mut alarms = self.alarms.clone();

        for notification in notifications {
            alarms.retain(|alarm| alarm.identifier() != notification.identifier());

            match notification.operation {
                OperationType::Create | OperationType::Update => {
                    alarms.push(Arc::new(notification));
                }
                OperationType::Delete => {
                    log::debug!("Removing alarm {}", notification.identifier());
                }
            }
        }

        let wanted = self.plan(&alarms)?;
        self.alarms = alarms;
        self.dispatch(wanted)
    }

    /// Plan all known alarms and bring the platform's notifications in line.
    pub fn reschedule(&mut self) -> Result<ScheduleSummary> {
        let wanted = self.plan(&self.alarms)?;
        self.dispatch(wanted)
    }

    fn plan(&self, alarms: &[Arc<AlarmNotification>]) -> Result<Vec<ScheduledNotification>> {
        if !self.enabled {
            return Ok(Vec::new());
        }

        let planned = self
            .model
            .future_occurrences(
                alarms,
                self.settings.per_alarm_limit,
                self.settings.overall_limit,
            )
            .context("Failed to plan alarm occurrences")?;

        Ok(planned.iter().map(ScheduledNotification::from).collect())
    }

    fn dispatch(&mut self, wanted: Vec<ScheduledNotification>) -> Result<ScheduleSummary> {
        let mut summary = ScheduleSummary::default();

        let stale: Vec<String> = self
            .scheduled
            .keys()
            .filter(|id| !wanted.iter().any(|n| &n.id == *id))
            .cloned()
            .collect();

        for id in stale {
            self.scheduler
                .cancel(&id)
                .with_context(|| format!("Failed to cancel notification {}", id))?;
            self.scheduled.remove(&id);
            summary.cancelled += 1;
        }

        for notification in wanted {
            if self.scheduled.get(&notification.id) == Some(&notification) {
                summary.unchanged += 1;
                continue;
            }

            self.scheduler
                .schedule(&notification)
                .with_context(|| format!("Failed to schedule notification {}", notification.id))?;
            self.scheduled.insert(notification.id.clone(), notification);
            summary.scheduled += 1;
        }

        log::info!(
            "Alarm notifications: {} scheduled, {} unchanged, {} cancelled",
            summary.scheduled,
            summary.unchanged,
            summary.cancelled
        );

        Ok(summary)
    }
}
