use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while constructing an exercise.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExerciseError {
    #[error("subtraction operands out of order: {a} < {b}")]
    NegativeResult { a: u32, b: u32 },

    #[error("result {result} is outside [0, 100)")]
    ResultOutOfRange { result: i64 },
}

//
// ─── OPERATION ────────────────────────────────────────────────────────────────
//

/// The two drill operations. Blocks strictly alternate between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Subtract,
}

impl Operation {
    /// The alternation partner. Applying twice returns the original operation.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Operation::Add => Operation::Subtract,
            Operation::Subtract => Operation::Add,
        }
    }

    /// Prompt symbol for this operation.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
        }
    }

    /// Apply the operation. Subtraction may go negative, hence `i64`.
    #[must_use]
    pub fn apply(self, a: u32, b: u32) -> i64 {
        match self {
            Operation::Add => i64::from(a) + i64::from(b),
            Operation::Subtract => i64::from(a) - i64::from(b),
        }
    }
}

//
// ─── COMPLEXITY ───────────────────────────────────────────────────────────────
//

/// Operand-magnitude category controlling the random generation ranges.
///
/// - `BothSmall`: both operands in [0, 9]
/// - `OneLarge`: exactly one operand in [0, 9], the other in [10, 99]
/// - `BothLarge`: both operands in [10, 99]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    BothSmall,
    OneLarge,
    BothLarge,
}

//
// ─── EXERCISE ─────────────────────────────────────────────────────────────────
//

/// A single two-operand prompt together with its expected answer.
///
/// Invariants: `answer < 100`, and for subtraction `a >= b` so the answer is
/// never negative. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub a: u32,
    pub b: u32,
    pub operation: Operation,
    pub answer: u32,
    pub complexity: Complexity,
}

impl Exercise {
    /// Build an exercise, computing and validating the answer.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::NegativeResult` for subtraction with `a < b`,
    /// and `ExerciseError::ResultOutOfRange` when the answer is not in
    /// [0, 100).
    pub fn new(
        a: u32,
        b: u32,
        operation: Operation,
        complexity: Complexity,
    ) -> Result<Self, ExerciseError> {
        let result = operation.apply(a, b);
        if result < 0 {
            return Err(ExerciseError::NegativeResult { a, b });
        }
        if result >= 100 {
            return Err(ExerciseError::ResultOutOfRange { result });
        }
        let answer =
            u32::try_from(result).map_err(|_| ExerciseError::ResultOutOfRange { result })?;

        Ok(Self {
            a,
            b,
            operation,
            answer,
            complexity,
        })
    }

    /// Whether the given answer matches this exercise.
    #[must_use]
    pub fn is_correct(&self, answer: u32) -> bool {
        answer == self.answer
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.a, self.operation.symbol(), self.b)
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_alternation_is_an_involution() {
        assert_eq!(Operation::Add.other(), Operation::Subtract);
        assert_eq!(Operation::Subtract.other(), Operation::Add);
        assert_eq!(Operation::Add.other().other(), Operation::Add);
    }

    #[test]
    fn apply_computes_signed_results() {
        assert_eq!(Operation::Add.apply(40, 2), 42);
        assert_eq!(Operation::Subtract.apply(2, 40), -38);
    }

    #[test]
    fn new_rejects_negative_subtraction() {
        let err = Exercise::new(3, 7, Operation::Subtract, Complexity::BothSmall).unwrap_err();
        assert!(matches!(err, ExerciseError::NegativeResult { a: 3, b: 7 }));
    }

    #[test]
    fn new_rejects_answers_of_one_hundred_or_more() {
        let err = Exercise::new(60, 55, Operation::Add, Complexity::BothLarge).unwrap_err();
        assert!(matches!(err, ExerciseError::ResultOutOfRange { result: 115 }));
    }

    #[test]
    fn new_computes_the_answer() {
        let add = Exercise::new(12, 7, Operation::Add, Complexity::OneLarge).unwrap();
        assert_eq!(add.answer, 19);
        assert!(add.is_correct(19));

        let sub = Exercise::new(12, 7, Operation::Subtract, Complexity::OneLarge).unwrap();
        assert_eq!(sub.answer, 5);
        assert!(!sub.is_correct(6));
    }

    #[test]
    fn display_renders_the_prompt() {
        let exercise = Exercise::new(12, 7, Operation::Subtract, Complexity::OneLarge).unwrap();
        assert_eq!(exercise.to_string(), "12 - 7");
    }
}
