mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use serde::{Deserialize, Serialize};

use crate::core::Millis;

/// Explicit navigation gesture that armed the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationGesture {
    SelectDocument,
    ScrollToDate,
    ScrollToColumn,
    KeepVisible,
    StepPeriod,
}

/// Public guard snapshot exposed to host applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GuardState {
    pub active: bool,
    pub expires_at: Millis,
    pub gesture: Option<NavigationGesture>,
}

/// Time-boxed flag suppressing passive selection-follow while an explicit
/// navigation is executing.
///
/// Expiry is an explicit timestamp compared against the injected clock, so
/// the guard lifecycle is testable without real delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationGuard {
    window_ms: Millis,
    state: GuardState,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(window_ms: Millis) -> Self {
        Self {
            window_ms,
            state: GuardState::default(),
        }
    }

    #[must_use]
    pub fn window_ms(self) -> Millis {
        self.window_ms
    }

    pub fn set_window_ms(&mut self, window_ms: Millis) {
        self.window_ms = window_ms;
    }

    #[must_use]
    pub fn state(self) -> GuardState {
        self.state
    }

    /// Activates the guard for one window starting at `now`.
    ///
    /// Re-arming never shortens an expiry already further in the future.
    pub fn arm(&mut self, gesture: NavigationGesture, now: Millis) {
        let expires_at = now.saturating_add(self.window_ms);
        self.state.expires_at = if self.state.active {
            self.state.expires_at.max(expires_at)
        } else {
            expires_at
        };
        self.state.active = true;
        self.state.gesture = Some(gesture);
    }

    /// Keeps an active guard alive for another window (navigation still pending).
    pub fn extend(&mut self, now: Millis) {
        if self.state.active {
            self.state.expires_at = self.state.expires_at.max(now.saturating_add(self.window_ms));
        }
    }

    /// Clears the guard ahead of its expiry.
    ///
    /// Returns `true` when the guard was active.
    pub fn complete(&mut self) -> bool {
        let was_active = self.state.active;
        self.state = GuardState::default();
        was_active
    }

    #[must_use]
    pub fn is_active(self, now: Millis) -> bool {
        self.state.active && now < self.state.expires_at
    }

    /// Clears the guard once its window elapsed.
    ///
    /// Returns `true` on the transition from active to cleared.
    pub fn expire(&mut self, now: Millis) -> bool {
        if self.state.active && now >= self.state.expires_at {
            self.state = GuardState::default();
            return true;
        }
        false
    }
}
