use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::model::{BLOCK_SIZE, Block, Complexity, Exercise, Operation};

/// Bound on randomized draws before falling back to the safe construction.
const MAX_GENERATION_ATTEMPTS: u32 = 100;

/// Last 1-based exercise position of the early difficulty stage.
const EARLY_STAGE_END: u32 = 33;

/// Last 1-based exercise position of the middle difficulty stage.
const MIDDLE_STAGE_END: u32 = 66;

/// Accept or reject a candidate exercise result.
///
/// Rejects negative results, results of 100 or more, and subtraction where
/// `a < b`. Pure, no side effects.
#[must_use]
pub fn validate_result(a: u32, b: u32, operation: Operation, result: i64) -> bool {
    if result < 0 {
        return false;
    }
    if result >= 100 {
        return false;
    }
    if operation == Operation::Subtract && a < b {
        return false;
    }
    true
}

/// Produces exercises and five-exercise blocks under the staged
/// complexity/operation policy.
///
/// Owns a seedable RNG so generation is reproducible under test; the default
/// constructor seeds from the thread RNG.
#[derive(Debug)]
pub struct ExerciseGenerator {
    rng: SmallRng,
}

impl ExerciseGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// Deterministic generator for tests.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate one exercise for the given operation and complexity.
    ///
    /// Operands are drawn uniformly from the complexity's ranges; for
    /// subtraction an out-of-order pair is swapped rather than re-drawn so
    /// the complexity distribution stays unbiased. The full draw is retried
    /// while `validate_result` rejects it, and after
    /// [`MAX_GENERATION_ATTEMPTS`] a safe construction guarantees a valid
    /// exercise, so this never fails.
    pub fn generate_exercise(&mut self, operation: Operation, complexity: Complexity) -> Exercise {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let (mut a, mut b) = self.draw_operands(complexity);
            if operation == Operation::Subtract && a < b {
                std::mem::swap(&mut a, &mut b);
            }

            let result = operation.apply(a, b);
            if !validate_result(a, b, operation, result) {
                continue;
            }
            if let Ok(exercise) = Exercise::new(a, b, operation, complexity) {
                return exercise;
            }
        }

        self.fallback(operation, complexity)
    }

    /// Generate a block of exactly [`BLOCK_SIZE`] exercises sharing the
    /// given operation and complexity.
    pub fn generate_block(&mut self, operation: Operation, complexity: Complexity) -> Block {
        let exercises = (0..BLOCK_SIZE)
            .map(|_| self.generate_exercise(operation, complexity))
            .collect();
        Block::new(operation, complexity, exercises)
            .expect("generated exercises share the requested operation and complexity")
    }

    /// Select the complexity for the exercise at the given 1-based position.
    ///
    /// One uniform draw is partitioned by cumulative thresholds:
    ///
    /// | stage  | positions | BothSmall | OneLarge | BothLarge |
    /// |--------|-----------|-----------|----------|-----------|
    /// | early  | 1–33      | 80%       | 20%      | 0%        |
    /// | middle | 34–66     | 30%       | 50%      | 20%       |
    /// | late   | 67–100    | 10%       | 30%      | 60%       |
    pub fn select_complexity(&mut self, position: u32) -> Complexity {
        let roll: f64 = self.rng.random();

        if position <= EARLY_STAGE_END {
            if roll < 0.8 {
                Complexity::BothSmall
            } else {
                Complexity::OneLarge
            }
        } else if position <= MIDDLE_STAGE_END {
            if roll < 0.3 {
                Complexity::BothSmall
            } else if roll < 0.8 {
                Complexity::OneLarge
            } else {
                Complexity::BothLarge
            }
        } else if roll < 0.1 {
            Complexity::BothSmall
        } else if roll < 0.4 {
            Complexity::OneLarge
        } else {
            Complexity::BothLarge
        }
    }

    fn draw_operands(&mut self, complexity: Complexity) -> (u32, u32) {
        match complexity {
            Complexity::BothSmall => (self.rng.random_range(0..10), self.rng.random_range(0..10)),
            Complexity::OneLarge => {
                let small = self.rng.random_range(0..10);
                let large = self.rng.random_range(10..100);
                if self.rng.random_bool(0.5) {
                    (small, large)
                } else {
                    (large, small)
                }
            }
            Complexity::BothLarge => (
                self.rng.random_range(10..100),
                self.rng.random_range(10..100),
            ),
        }
    }

    /// Deterministic safe construction used after retry exhaustion.
    ///
    /// Addition picks `a` then bounds `b` so `a + b < 100`; subtraction picks
    /// `a` in [1, 99] then `b` in [0, a].
    fn fallback(&mut self, operation: Operation, complexity: Complexity) -> Exercise {
        let (a, b) = match operation {
            Operation::Add => {
                let a = self.rng.random_range(0..50);
                let b = self.rng.random_range(0..(100 - a));
                (a, b)
            }
            Operation::Subtract => {
                let a = self.rng.random_range(1..100);
                let b = self.rng.random_range(0..=a);
                (a, b)
            }
        };

        Exercise::new(a, b, operation, complexity)
            .expect("fallback construction always satisfies the result bounds")
    }
}

impl Default for ExerciseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
