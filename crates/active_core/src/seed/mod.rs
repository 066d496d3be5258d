//! Development-time seeding of synthetic data.
//!
//! # Responsibility
//! - Run ordered, idempotent seed steps on one background transaction.
//! - Report post-seed entity counts and erase previously seeded data.
//! - Provide dummy-record factories for seed steps and tests.
//!
//! # Invariants
//! - Base steps always run before extension steps.
//! - A seed run commits at most once; steps never commit.
//! - Seed commit failures are reported, erase failures are returned as errors.

use crate::db::DbError;
use crate::repo::RepoError;
use rusqlite::Transaction;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod factory;
mod seeder;
pub mod steps;

pub use seeder::{EntityCounts, EraseSummary, SeedReport, Seeder, StepFailure};

pub type SeedResult<T> = Result<T, SeedError>;

/// One idempotent unit of synthetic-data insertion.
///
/// Implementations re-check whatever they insert before inserting it, so a
/// second seed run leaves the store unchanged.
pub trait SeedStep: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &str;

    /// Inserts this step's records through `tx` without committing.
    fn apply(&self, tx: &Transaction<'_>) -> Result<(), RepoError>;
}

/// Errors from seed orchestration.
#[derive(Debug)]
pub enum SeedError {
    /// Background or view context could not be acquired.
    ContextUnavailable(DbError),
    /// Erase could not delete or commit.
    EraseFailed(RepoError),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContextUnavailable(err) => write!(f, "store context unavailable: {err}"),
            Self::EraseFailed(err) => write!(f, "erasing seeded entities failed: {err}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ContextUnavailable(err) => Some(err),
            Self::EraseFailed(err) => Some(err),
        }
    }
}
