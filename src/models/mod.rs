// Module exports for models

pub mod alarm;
pub mod recurrence;
pub mod settings;
