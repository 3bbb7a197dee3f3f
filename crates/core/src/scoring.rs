use crate::model::{ExerciseOutcome, RoundResult};

//
// ─── CALIBRATION CONSTANTS ────────────────────────────────────────────────────
//

/// Fixed round length every star rating is scored against.
pub const SCORED_ROUND_LENGTH: u32 = 100;

/// Flat penalty added to the adjusted time per wrong answer.
pub const WRONG_ANSWER_PENALTY_MS: u64 = 1_000;

/// Correctness gate, in percent, below which no stars are awarded.
const STAR_GATE_PERCENT: f64 = 90.0;

/// Adjusted-seconds ceiling for three stars (2.5 s per exercise on average).
const THREE_STAR_SECONDS: f64 = 250.0;

/// Adjusted-seconds ceiling for two stars (3.5 s per exercise on average).
const TWO_STAR_SECONDS: f64 = 350.0;

//
// ─── ROUND STATS ──────────────────────────────────────────────────────────────
//

/// Aggregate statistics over one round's outcomes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoundStats {
    pub total: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub correctness_rate: f64,
    pub total_time_ms: u64,
    pub avg_time_ms: f64,
    pub adjusted_time_ms: u64,
    pub star_rating: u8,
}

/// Convert a completed round's raw outcomes into aggregate statistics.
///
/// Empty input yields all-zero stats and a zero star rating. The adjusted
/// time charges [`WRONG_ANSWER_PENALTY_MS`] per wrong answer on top of the
/// summed exercise times.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_round(outcomes: &[ExerciseOutcome]) -> RoundStats {
    if outcomes.is_empty() {
        return RoundStats::default();
    }

    let total = u32::try_from(outcomes.len()).unwrap_or(u32::MAX);
    let mut correct = 0_u32;
    let mut incorrect = 0_u32;
    let mut total_time_ms = 0_u64;
    for outcome in outcomes {
        if outcome.correct {
            correct += 1;
        } else {
            incorrect += 1;
        }
        total_time_ms += outcome.elapsed_ms;
    }

    let correctness_rate = f64::from(correct) / f64::from(total) * 100.0;
    let avg_time_ms = total_time_ms as f64 / f64::from(total);
    let adjusted_time_ms = total_time_ms + u64::from(incorrect) * WRONG_ANSWER_PENALTY_MS;
    let star_rating = star_rating(correct, incorrect, total_time_ms);

    RoundStats {
        total,
        correct,
        incorrect,
        correctness_rate,
        total_time_ms,
        avg_time_ms,
        adjusted_time_ms,
        star_rating,
    }
}

/// Derive the 0–3 star rating from correctness and speed.
///
/// Correctness gates any star: the rate is always computed against the fixed
/// [`SCORED_ROUND_LENGTH`], and anything below 90% earns 0 stars regardless
/// of speed. Above the gate, the penalty-adjusted time decides between 3, 2
/// and 1 stars. The thresholds are calibration constants, not derived.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn star_rating(correct: u32, incorrect: u32, total_time_ms: u64) -> u8 {
    let rate = f64::from(correct) / f64::from(SCORED_ROUND_LENGTH) * 100.0;
    if rate < STAR_GATE_PERCENT {
        return 0;
    }

    let adjusted_ms = total_time_ms + u64::from(incorrect) * WRONG_ANSWER_PENALTY_MS;
    let adjusted_seconds = adjusted_ms as f64 / 1_000.0;
    if adjusted_seconds <= THREE_STAR_SECONDS {
        3
    } else if adjusted_seconds <= TWO_STAR_SECONDS {
        2
    } else {
        1
    }
}

//
// ─── ALL-TIME STATS ───────────────────────────────────────────────────────────
//

/// Aggregate over the full round history.
///
/// Per-round averages are unweighted: every round has the same fixed length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllTimeStats {
    pub total_rounds: u32,
    pub total_exercises: u32,
    pub total_time_ms: u64,
    pub avg_time_per_exercise_ms: f64,
    pub avg_correctness_rate: f64,
    pub avg_star_rating: f64,
    pub total_correct: u32,
    pub total_incorrect: u32,
}

/// Aggregate the round history; empty history yields the all-zero aggregate.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn all_time_stats(round_history: &[RoundResult]) -> AllTimeStats {
    if round_history.is_empty() {
        return AllTimeStats::default();
    }

    let total_rounds = u32::try_from(round_history.len()).unwrap_or(u32::MAX);
    let mut total_exercises = 0_u32;
    let mut total_time_ms = 0_u64;
    let mut total_correct = 0_u32;
    let mut total_incorrect = 0_u32;
    let mut rate_sum = 0.0_f64;
    let mut star_sum = 0.0_f64;
    for round in round_history {
        total_exercises += round.correct + round.incorrect;
        total_time_ms += round.total_time_ms;
        total_correct += round.correct;
        total_incorrect += round.incorrect;
        rate_sum += round.correctness_rate;
        star_sum += f64::from(round.star_rating);
    }

    let avg_time_per_exercise_ms = if total_exercises > 0 {
        total_time_ms as f64 / f64::from(total_exercises)
    } else {
        0.0
    };

    AllTimeStats {
        total_rounds,
        total_exercises,
        total_time_ms,
        avg_time_per_exercise_ms,
        avg_correctness_rate: rate_sum / f64::from(total_rounds),
        avg_star_rating: star_sum / f64::from(total_rounds),
        total_correct,
        total_incorrect,
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Complexity, Exercise, Operation, RoundId};
    use crate::time::fixed_now;

    fn outcome(elapsed_ms: u64, correct: bool) -> ExerciseOutcome {
        let exercise = Exercise::new(4, 3, Operation::Add, Complexity::BothSmall).unwrap();
        ExerciseOutcome::new(exercise, elapsed_ms, correct, fixed_now())
    }

    #[test]
    fn star_rating_thresholds() {
        assert_eq!(star_rating(100, 0, 240_000), 3);
        assert_eq!(star_rating(100, 0, 300_000), 2);
        assert_eq!(star_rating(95, 5, 400_000), 1);
        assert_eq!(star_rating(89, 11, 200_000), 0);
    }

    #[test]
    fn star_rating_charges_the_wrong_answer_penalty() {
        // 245 s raw + 10 s of penalties crosses the three-star ceiling.
        assert_eq!(star_rating(90, 10, 245_000), 2);
        assert_eq!(star_rating(90, 10, 240_000), 3);
    }

    #[test]
    fn score_round_aggregates_outcomes() {
        let outcomes = vec![
            outcome(2_000, true),
            outcome(1_500, true),
            outcome(3_000, false),
        ];

        let stats = score_round(&outcomes);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.correct, 2);
        assert_eq!(stats.incorrect, 1);
        assert_eq!(stats.total_time_ms, 6_500);
        assert!((stats.avg_time_ms - 6_500.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.adjusted_time_ms, 7_500);
        // Two correct answers against a 100-exercise round gate to zero stars.
        assert_eq!(stats.star_rating, 0);
    }

    #[test]
    fn score_round_of_nothing_is_all_zero() {
        let stats = score_round(&[]);
        assert_eq!(stats, RoundStats::default());
        assert_eq!(stats.star_rating, 0);
    }

    fn round(correct: u32, incorrect: u32, total_time_ms: u64, stars: u8) -> RoundResult {
        RoundResult {
            round_id: RoundId::first(),
            date: fixed_now(),
            total_time_ms,
            avg_time_ms: 0.0,
            correct,
            incorrect,
            correctness_rate: f64::from(correct),
            adjusted_time_ms: total_time_ms,
            star_rating: stars,
        }
    }

    #[test]
    fn all_time_stats_averages_rounds_unweighted() {
        let history = vec![
            round(100, 0, 240_000, 3),
            round(90, 10, 400_000, 1),
        ];

        let stats = all_time_stats(&history);

        assert_eq!(stats.total_rounds, 2);
        assert_eq!(stats.total_exercises, 200);
        assert_eq!(stats.total_time_ms, 640_000);
        assert_eq!(stats.total_correct, 190);
        assert_eq!(stats.total_incorrect, 10);
        assert!((stats.avg_time_per_exercise_ms - 3_200.0).abs() < 1e-9);
        assert!((stats.avg_correctness_rate - 95.0).abs() < 1e-9);
        assert!((stats.avg_star_rating - 2.0).abs() < 1e-9);
    }

    #[test]
    fn all_time_stats_of_empty_history_is_all_zero() {
        assert_eq!(all_time_stats(&[]), AllTimeStats::default());
    }
}
