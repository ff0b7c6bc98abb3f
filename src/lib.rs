// Calendar Alarms Library
// Computes the future points in time at which event reminders must fire

pub mod error;
pub mod models;
pub mod services;

pub use error::AlarmError;
pub use models::alarm::{
    AlarmInfo, AlarmInterval, AlarmIntervalUnit, AlarmNotification, AlarmOccurrence,
    OperationType,
};
pub use models::recurrence::{AdvancedRule, ByRuleType, EndCondition, RepeatPeriod, RepeatRule};
pub use services::alarm::{plan_future_occurrences, AlarmModel, FutureAlarmOccurrences};
pub use services::date_provider::{DateProvider, FixedDateProvider, SystemDateProvider};
