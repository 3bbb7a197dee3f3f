use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Exercise;

/// Record of a single answered exercise.
///
/// One is produced per answer and appended to the global exercise history;
/// never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseOutcome {
    pub exercise: Exercise,
    pub elapsed_ms: u64,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl ExerciseOutcome {
    #[must_use]
    pub fn new(
        exercise: Exercise,
        elapsed_ms: u64,
        correct: bool,
        answered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            exercise,
            elapsed_ms,
            correct,
            answered_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Complexity, Operation};
    use crate::time::fixed_now;

    #[test]
    fn outcome_captures_the_answered_exercise() {
        let exercise = Exercise::new(8, 3, Operation::Subtract, Complexity::BothSmall).unwrap();
        let outcome = ExerciseOutcome::new(exercise.clone(), 2_100, true, fixed_now());

        assert_eq!(outcome.exercise, exercise);
        assert_eq!(outcome.elapsed_ms, 2_100);
        assert!(outcome.correct);
    }
}
