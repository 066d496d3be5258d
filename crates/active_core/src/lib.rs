//! Data core for the Active habit tracker.
//! Persistence models, SQLite repositories and the development seeder.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use db::{DbError, DbResult, Store, StoreLocation};
pub use logging::{default_log_level, init_console_logging, init_logging, logging_status, LogSink};
pub use model::day::Day;
pub use model::days_sequence::DaysSequence;
pub use model::entity::EntityKind;
pub use model::fire_time::FireTime;
pub use model::habit::{Habit, HabitColor};
pub use model::habit_day::HabitDay;
pub use model::notification::Notification;
pub use model::user::User;
pub use model::ValidationError;
pub use repo::{count_entities, RepoError, RepoResult};
pub use seed::{
    EntityCounts, EraseSummary, SeedError, SeedReport, SeedResult, SeedStep, Seeder, StepFailure,
};
pub use service::user_storage::UserStorage;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
