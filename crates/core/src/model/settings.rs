use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("exercises per round must be > 0")]
    InvalidRoundLength,

    #[error("milestones must satisfy 0 < minor < major < round length")]
    InvalidMilestones,

    #[error("reward probability must be a finite value in [0, 1]")]
    InvalidRewardProbability,
}

//
// ─── SETTINGS ─────────────────────────────────────────────────────────────────
//

/// Round pacing and reward configuration.
///
/// Controls round length, milestone marks, the variable-reward odds, and the
/// presentation delays that pace exercise transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSettings {
    exercises_per_round: u32,
    minor_milestone: u32,
    major_milestone: u32,
    reward_probability: f64,
    advance_delay_ms: u64,
    completion_delay_ms: u64,
}

impl RoundSettings {
    /// Creates the defaults calibrated for young learners:
    /// - 100 exercises per round
    /// - milestone celebrations at 5 and 25
    /// - 25% odds of an amplified celebration on a correct answer
    /// - 1.8 s / 2 s presentation delays so feedback stays visible
    #[must_use]
    pub fn default_for_kids() -> Self {
        Self {
            exercises_per_round: 100,
            minor_milestone: 5,
            major_milestone: 25,
            reward_probability: 0.25,
            advance_delay_ms: 1_800,
            completion_delay_ms: 2_000,
        }
    }

    /// Creates custom round settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the round length is zero, the milestones are not
    /// strictly ordered within the round, or the reward probability is not a
    /// finite value in [0, 1].
    pub fn new(
        exercises_per_round: u32,
        minor_milestone: u32,
        major_milestone: u32,
        reward_probability: f64,
        advance_delay_ms: u64,
        completion_delay_ms: u64,
    ) -> Result<Self, SettingsError> {
        if exercises_per_round == 0 {
            return Err(SettingsError::InvalidRoundLength);
        }
        if minor_milestone == 0
            || minor_milestone >= major_milestone
            || major_milestone >= exercises_per_round
        {
            return Err(SettingsError::InvalidMilestones);
        }
        if !reward_probability.is_finite() || !(0.0..=1.0).contains(&reward_probability) {
            return Err(SettingsError::InvalidRewardProbability);
        }

        Ok(Self {
            exercises_per_round,
            minor_milestone,
            major_milestone,
            reward_probability,
            advance_delay_ms,
            completion_delay_ms,
        })
    }

    #[must_use]
    pub fn exercises_per_round(&self) -> u32 {
        self.exercises_per_round
    }

    #[must_use]
    pub fn minor_milestone(&self) -> u32 {
        self.minor_milestone
    }

    #[must_use]
    pub fn major_milestone(&self) -> u32 {
        self.major_milestone
    }

    #[must_use]
    pub fn reward_probability(&self) -> f64 {
        self.reward_probability
    }

    #[must_use]
    pub fn advance_delay_ms(&self) -> u64 {
        self.advance_delay_ms
    }

    #[must_use]
    pub fn completion_delay_ms(&self) -> u64 {
        self.completion_delay_ms
    }
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self::default_for_kids()
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_calibrated_round() {
        let settings = RoundSettings::default_for_kids();
        assert_eq!(settings.exercises_per_round(), 100);
        assert_eq!(settings.minor_milestone(), 5);
        assert_eq!(settings.major_milestone(), 25);
        assert!((settings.reward_probability() - 0.25).abs() < f64::EPSILON);
        assert_eq!(settings.advance_delay_ms(), 1_800);
        assert_eq!(settings.completion_delay_ms(), 2_000);
    }

    #[test]
    fn new_rejects_zero_round_length() {
        let err = RoundSettings::new(0, 5, 25, 0.25, 0, 0).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidRoundLength));
    }

    #[test]
    fn new_rejects_unordered_milestones() {
        assert!(matches!(
            RoundSettings::new(100, 25, 5, 0.25, 0, 0),
            Err(SettingsError::InvalidMilestones)
        ));
        assert!(matches!(
            RoundSettings::new(20, 5, 25, 0.25, 0, 0),
            Err(SettingsError::InvalidMilestones)
        ));
    }

    #[test]
    fn new_rejects_invalid_reward_probability() {
        assert!(matches!(
            RoundSettings::new(100, 5, 25, 1.5, 0, 0),
            Err(SettingsError::InvalidRewardProbability)
        ));
        assert!(matches!(
            RoundSettings::new(100, 5, 25, f64::NAN, 0, 0),
            Err(SettingsError::InvalidRewardProbability)
        ));
    }
}
