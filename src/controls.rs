use std::time::{Duration, Instant};

/// What the next pointer click will do.
///
/// Arming is one-shot: the first click consumes it, and an arming that is
/// not consumed within the timeout lapses on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerMode {
    #[default]
    Idle,
    Anchor {
        armed_at: Instant,
    },
    PlaceBlackHole {
        armed_at: Instant,
    },
}

/// Action a consumed click should perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerAction {
    ToggleAnchor,
    PlaceBlackHole,
}

impl PointerMode {
    /// Arms anchor toggling, replacing any previous arming.
    pub fn arm_anchor(&mut self, now: Instant) {
        *self = Self::Anchor { armed_at: now };
    }

    /// Arms black hole placement, replacing any previous arming.
    pub fn arm_black_hole(&mut self, now: Instant) {
        *self = Self::PlaceBlackHole { armed_at: now };
    }

    /// The pending action, if one is armed and has not lapsed at `now`.
    pub fn pending(&self, now: Instant, timeout: Duration) -> Option<PointerAction> {
        let (armed_at, action) = match *self {
            Self::Idle => return None,
            Self::Anchor { armed_at } => (armed_at, PointerAction::ToggleAnchor),
            Self::PlaceBlackHole { armed_at } => (armed_at, PointerAction::PlaceBlackHole),
        };
        (now.saturating_duration_since(armed_at) <= timeout).then_some(action)
    }

    /// Consumes the arming for a click at `now`. Lapsed armings are dropped
    /// and yield nothing.
    pub fn take(&mut self, now: Instant, timeout: Duration) -> Option<PointerAction> {
        let action = self.pending(now, timeout);
        *self = Self::Idle;
        action
    }
}
