//! File-backed planner settings.

mod service;

pub use service::SettingsService;
