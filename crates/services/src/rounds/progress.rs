use drill_core::model::{RoundResult, StreakInfo};
use drill_core::scoring::AllTimeStats;

/// Aggregated view of round progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundProgress {
    pub answered: u32,
    pub total: u32,
    pub remaining: u32,
    pub is_complete: bool,
}

/// Everything a results screen needs in one read.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressOverview {
    pub all_time: AllTimeStats,
    pub streak: StreakInfo,
    pub recent_rounds: Vec<RoundResult>,
}
