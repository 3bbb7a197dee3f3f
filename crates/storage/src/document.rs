use serde::{Deserialize, Serialize};

use drill_core::model::{ExerciseOutcome, RoundId, RoundResult, RoundState, StreakInfo};

/// The single persisted record.
///
/// Every store operation loads this document in full, mutates it in memory,
/// and writes it back whole; no partial updates exist. Downstream invariants
/// (monotonic round ids, trailing-slice round recovery) rely on that
/// consistent whole-document view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProgressDocument {
    pub current_state: RoundState,
    pub exercise_history: Vec<ExerciseOutcome>,
    pub round_history: Vec<RoundResult>,
    pub streak: StreakInfo,
}

impl ProgressDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next sequential round id: one past the current maximum, starting at 1.
    #[must_use]
    pub fn next_round_id(&self) -> RoundId {
        self.round_history
            .iter()
            .map(|round| round.round_id.value())
            .max()
            .map_or(RoundId::first(), |max| RoundId::new(max + 1))
    }

    /// Outcomes belonging to the in-progress round: the trailing
    /// `exercise_count` entries of the global exercise history.
    #[must_use]
    pub fn current_round_outcomes(&self) -> Vec<ExerciseOutcome> {
        let count = self.current_state.exercise_count as usize;
        if count == 0 || self.exercise_history.len() < count {
            return Vec::new();
        }
        self.exercise_history[self.exercise_history.len() - count..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::model::{Complexity, Exercise, Operation};
    use drill_core::scoring::RoundStats;
    use drill_core::time::fixed_now;

    fn outcome(a: u32) -> ExerciseOutcome {
        let exercise = Exercise::new(a, 1, Operation::Add, Complexity::BothSmall).unwrap();
        ExerciseOutcome::new(exercise, 1_000, true, fixed_now())
    }

    #[test]
    fn empty_document_starts_round_ids_at_one() {
        assert_eq!(ProgressDocument::new().next_round_id(), RoundId::first());
    }

    #[test]
    fn next_round_id_is_one_past_the_maximum() {
        let mut document = ProgressDocument::new();
        for id in [1_u64, 3] {
            document.round_history.push(RoundResult::from_stats(
                RoundId::new(id),
                fixed_now(),
                &RoundStats::default(),
            ));
        }

        assert_eq!(document.next_round_id(), RoundId::new(4));
    }

    #[test]
    fn current_round_outcomes_take_the_trailing_slice() {
        let mut document = ProgressDocument::new();
        document.exercise_history = (0..6).map(outcome).collect();
        document.current_state.exercise_count = 2;

        let current = document.current_round_outcomes();
        assert_eq!(current.len(), 2);
        assert_eq!(current[0].exercise.a, 4);
        assert_eq!(current[1].exercise.a, 5);
    }

    #[test]
    fn current_round_outcomes_are_empty_when_nothing_is_in_flight() {
        let mut document = ProgressDocument::new();
        document.exercise_history = (0..3).map(outcome).collect();

        assert!(document.current_round_outcomes().is_empty());

        // A count larger than the recorded history yields nothing rather
        // than a short slice.
        document.current_state.exercise_count = 9;
        assert!(document.current_round_outcomes().is_empty());
    }
}
