use chrono::{DateTime, Utc};

/// Handle for one scheduled continuation.
///
/// Scheduling again supersedes the previous handle; redeeming a superseded
/// handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvanceToken(u64);

impl AdvanceToken {
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// What a pending continuation will do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    NextExercise,
    CompleteRound,
    AutoSubmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    token: AdvanceToken,
    action: PendingAction,
    due_at: DateTime<Utc>,
}

/// Single-slot scheduler for presentation-paced continuations.
///
/// The round core never blocks: every wait is a continuation scheduled here
/// and fired by the shell when its delay elapses. New input supersedes the
/// pending continuation by scheduling over it.
#[derive(Debug, Default)]
pub struct Pacer {
    counter: u64,
    pending: Option<Pending>,
}

impl Pacer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a continuation, superseding any pending one.
    pub fn schedule(&mut self, action: PendingAction, due_at: DateTime<Utc>) -> AdvanceToken {
        self.counter += 1;
        let token = AdvanceToken(self.counter);
        self.pending = Some(Pending {
            token,
            action,
            due_at,
        });
        token
    }

    /// Drop the pending continuation, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn pending_action(&self) -> Option<PendingAction> {
        self.pending.map(|p| p.action)
    }

    #[must_use]
    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.pending.map(|p| p.due_at)
    }

    /// Whether the token still refers to the pending continuation.
    #[must_use]
    pub fn is_current(&self, token: AdvanceToken) -> bool {
        self.pending.is_some_and(|p| p.token == token)
    }

    /// Redeem a token: returns the action and clears the slot when the token
    /// is still current, `None` for superseded or cancelled tokens.
    pub fn redeem(&mut self, token: AdvanceToken) -> Option<PendingAction> {
        if !self.is_current(token) {
            return None;
        }
        self.pending.take().map(|p| p.action)
    }
}
