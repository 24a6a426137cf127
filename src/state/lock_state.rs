/// Lock state definitions for the shared marker board
///
/// Every address the platform has touched carries one of these values in the
/// lock store. The stored representation is the integer discriminant.
use std::fmt;

/// Represents the progress marker of an address in the lock store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockState {
    /// No record; the address has never been claimed
    Free,

    /// Claimed by an orchestrator, discovery in progress
    Locked,

    /// Discovery completed successfully
    Done,

    /// Discovery was attempted and errored
    Failed,
}

impl LockState {
    /// Returns the integer stored in the lock store for this state
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Free => 0,
            Self::Locked => 1,
            Self::Done => 2,
            Self::Failed => 3,
        }
    }

    /// Parses a state from its stored integer
    ///
    /// Returns None if the value doesn't match any known state.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Free),
            1 => Some(Self::Locked),
            2 => Some(Self::Done),
            3 => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns true if some orchestrator has already claimed the address
    ///
    /// Claimed addresses are never enqueued again, whatever the outcome of
    /// the claim was.
    pub fn is_claimed(&self) -> bool {
        !matches!(self, Self::Free)
    }

    /// Returns true if a single crawl may move an address from `self` to `next`
    pub fn can_transition_to(&self, next: LockState) -> bool {
        matches!(
            (self, next),
            (Self::Free, Self::Locked) | (Self::Locked, Self::Done) | (Self::Locked, Self::Failed)
        )
    }

    /// Returns all possible lock states
    pub fn all_states() -> Vec<Self> {
        vec![Self::Free, Self::Locked, Self::Done, Self::Failed]
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Free => "FREE",
            Self::Locked => "LOCKED",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}
