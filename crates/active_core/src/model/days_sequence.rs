//! Days sequence model and its executed/missed partition.
//!
//! # Responsibility
//! - Describe the tracking period of one habit.
//! - Split the sequence's tracked days by outcome.
//!
//! # Invariants
//! - `from <= to`.
//! - Every tracked day in `days` carries this sequence's id.
//! - `days == None` means the collection was never loaded, which is not the
//!   same as an empty sequence.

use super::habit::HabitId;
use super::habit_day::HabitDay;
use super::{now_epoch_ms, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

pub type DaysSequenceId = Uuid;

/// A sequence of days a user set up for one habit to be tracked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaysSequence {
    pub id: DaysSequenceId,
    pub habit_id: HabitId,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub created_at: i64,
    /// Tracked days, when loaded from the store.
    pub days: Option<Vec<HabitDay>>,
}

impl DaysSequence {
    /// Creates a sequence whose day collection is not loaded yet.
    pub fn new(habit_id: HabitId, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            habit_id,
            from,
            to,
            created_at: now_epoch_ms(),
            days: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId("days sequence"));
        }
        if self.to < self.from {
            return Err(ValidationError::ReversedSequenceWindow {
                from: self.from,
                to: self.to,
            });
        }
        Ok(())
    }

    /// Number of calendar days covered by `from..=to`.
    pub fn len_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Days marked as executed. `None` when days are not loaded.
    pub fn executed_days(&self) -> Option<HashSet<&HabitDay>> {
        self.filter_days(HabitDay::is_executed)
    }

    /// Days marked as missed. `None` when days are not loaded.
    ///
    /// Days without a recorded outcome are not missed.
    pub fn missed_days(&self) -> Option<HashSet<&HabitDay>> {
        self.filter_days(HabitDay::is_missed)
    }

    /// Days with no outcome yet. `None` when days are not loaded.
    pub fn pending_days(&self) -> Option<HashSet<&HabitDay>> {
        self.filter_days(HabitDay::is_pending)
    }

    fn filter_days(&self, predicate: fn(&HabitDay) -> bool) -> Option<HashSet<&HabitDay>> {
        self.days
            .as_ref()
            .map(|days| days.iter().filter(|day| predicate(day)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::DaysSequence;
    use crate::model::habit_day::HabitDay;
    use chrono::{Days, NaiveDate};
    use std::collections::HashSet;
    use uuid::Uuid;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn sequence_with_outcomes(outcomes: &[Option<bool>]) -> DaysSequence {
        let to = start() + Days::new(outcomes.len() as u64 - 1);
        let mut sequence = DaysSequence::new(Uuid::new_v4(), start(), to);
        let days = outcomes
            .iter()
            .enumerate()
            .map(|(offset, outcome)| {
                let mut day = HabitDay::new(
                    sequence.habit_id,
                    sequence.id,
                    Uuid::new_v4(),
                    start() + Days::new(offset as u64),
                );
                day.was_executed = *outcome;
                day
            })
            .collect();
        sequence.days = Some(days);
        sequence
    }

    #[test]
    fn partitions_are_disjoint_subsets_of_days() {
        let sequence = sequence_with_outcomes(&[
            Some(true),
            Some(false),
            None,
            Some(true),
            Some(false),
            Some(false),
        ]);
        let executed = sequence.executed_days().unwrap();
        let missed = sequence.missed_days().unwrap();
        let all: HashSet<_> = sequence.days.as_ref().unwrap().iter().collect();

        assert_eq!(executed.len(), 2);
        assert_eq!(missed.len(), 3);
        assert!(executed.is_disjoint(&missed));
        assert!(executed.union(&missed).all(|day| all.contains(day)));
        assert!(executed.iter().all(|day| day.was_executed == Some(true)));
        assert!(missed.iter().all(|day| day.was_executed == Some(false)));
    }

    #[test]
    fn days_without_outcome_are_in_neither_partition() {
        let sequence = sequence_with_outcomes(&[None, None]);
        assert!(sequence.executed_days().unwrap().is_empty());
        assert!(sequence.missed_days().unwrap().is_empty());
        assert_eq!(sequence.pending_days().unwrap().len(), 2);
    }

    #[test]
    fn unloaded_days_yield_none_for_every_partition() {
        let sequence = DaysSequence::new(Uuid::new_v4(), start(), start());
        assert!(sequence.executed_days().is_none());
        assert!(sequence.missed_days().is_none());
        assert!(sequence.pending_days().is_none());
    }

    #[test]
    fn loaded_but_empty_days_yield_empty_sets() {
        let mut sequence = DaysSequence::new(Uuid::new_v4(), start(), start());
        sequence.days = Some(Vec::new());
        assert_eq!(sequence.executed_days(), Some(HashSet::new()));
        assert_eq!(sequence.missed_days(), Some(HashSet::new()));
    }

    #[test]
    fn validate_rejects_reversed_window() {
        let sequence = DaysSequence::new(Uuid::new_v4(), start() + Days::new(1), start());
        assert!(sequence.validate().is_err());
        assert_eq!(
            DaysSequence::new(Uuid::new_v4(), start(), start() + Days::new(6)).len_days(),
            7
        );
    }
}
