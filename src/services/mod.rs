// Service module exports

pub mod alarm;
pub mod date_provider;
pub mod notification;
pub mod recurrence;
pub mod settings;
