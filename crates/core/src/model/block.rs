use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Complexity, Exercise, Operation};

/// Number of exercises in every block: the unit of operation/complexity
/// re-selection.
pub const BLOCK_SIZE: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BlockError {
    #[error("block must contain exactly {BLOCK_SIZE} exercises, got {len}")]
    WrongLength { len: usize },

    #[error("exercise {index} does not share the block operation and complexity")]
    Mixed { index: usize },
}

/// An ordered run of exactly five exercises sharing one operation and one
/// complexity. Created at a block boundary, consumed exercise-by-exercise,
/// discarded when exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    operation: Operation,
    complexity: Complexity,
    exercises: Vec<Exercise>,
}

impl Block {
    /// Build a block from the given exercises.
    ///
    /// # Errors
    ///
    /// Returns `BlockError::WrongLength` unless exactly [`BLOCK_SIZE`]
    /// exercises are provided, and `BlockError::Mixed` if any exercise does
    /// not share the block's operation and complexity.
    pub fn new(
        operation: Operation,
        complexity: Complexity,
        exercises: Vec<Exercise>,
    ) -> Result<Self, BlockError> {
        if exercises.len() != BLOCK_SIZE {
            return Err(BlockError::WrongLength {
                len: exercises.len(),
            });
        }
        for (index, exercise) in exercises.iter().enumerate() {
            if exercise.operation != operation || exercise.complexity != complexity {
                return Err(BlockError::Mixed { index });
            }
        }

        Ok(Self {
            operation,
            complexity,
            exercises,
        })
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    #[must_use]
    pub fn complexity(&self) -> Complexity {
        self.complexity
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Whether the consumption cursor has moved past the last exercise.
    #[must_use]
    pub fn is_exhausted(&self, index: usize) -> bool {
        index >= self.exercises.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(a: u32, b: u32) -> Exercise {
        Exercise::new(a, b, Operation::Add, Complexity::BothSmall).unwrap()
    }

    #[test]
    fn block_requires_exactly_five_exercises() {
        let err = Block::new(
            Operation::Add,
            Complexity::BothSmall,
            vec![exercise(1, 2), exercise(3, 4)],
        )
        .unwrap_err();
        assert!(matches!(err, BlockError::WrongLength { len: 2 }));
    }

    #[test]
    fn block_rejects_mixed_members() {
        let mut members: Vec<Exercise> = (0..5).map(|i| exercise(i, i)).collect();
        members[3] = Exercise::new(9, 4, Operation::Subtract, Complexity::BothSmall).unwrap();

        let err = Block::new(Operation::Add, Complexity::BothSmall, members).unwrap_err();
        assert!(matches!(err, BlockError::Mixed { index: 3 }));
    }

    #[test]
    fn block_is_consumed_by_index() {
        let members: Vec<Exercise> = (0..5).map(|i| exercise(i, i)).collect();
        let block = Block::new(Operation::Add, Complexity::BothSmall, members).unwrap();

        assert_eq!(block.len(), BLOCK_SIZE);
        assert!(!block.is_exhausted(4));
        assert!(block.is_exhausted(5));
        assert_eq!(block.get(2).unwrap().a, 2);
        assert!(block.get(5).is_none());
    }
}
