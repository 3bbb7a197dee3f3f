use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based identifier of a completed round, assigned sequentially by the
/// progress store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoundId(u64);

impl RoundId {
    /// Creates a `RoundId` from its numeric value.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The id assigned to the very first completed round.
    #[must_use]
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the underlying value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoundId({})", self.0)
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_round_id_is_one() {
        assert_eq!(RoundId::first().value(), 1);
    }

    #[test]
    fn round_id_display() {
        assert_eq!(RoundId::new(42).to_string(), "42");
    }
}
