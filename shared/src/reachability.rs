use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::capabilities::ConnectivityError;

/// Network classification reported by the platform monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    Wifi,
    Mobile,
    /// No network at all.
    None,
    #[default]
    Unknown,
}

impl Reachability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wifi => "wifi",
            Self::Mobile => "mobile",
            Self::None => "none",
            Self::Unknown => "unknown",
        }
    }

    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Wifi | Self::Mobile)
    }
}

impl std::fmt::Display for Reachability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Subscription {
    #[default]
    Idle,
    Active,
    Released,
}

/// Single owner of the reachability state.
///
/// The conversion engine only ever reads [`has_problem`](Self::has_problem);
/// the exact [`state`](Self::state) is informational.
#[derive(Debug, Clone, Default)]
pub struct ReachabilityTracker {
    state: Reachability,
    problem: bool,
    subscription: Subscription,
    /// Set by the first subscription event; the startup query is stale after it.
    streamed: bool,
}

impl ReachabilityTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> Reachability {
        self.state
    }

    #[must_use]
    pub const fn has_problem(&self) -> bool {
        self.problem
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription == Subscription::Active
    }

    /// Returns `true` only the first time, when the caller must run the
    /// initial check and open the change subscription.
    pub fn start(&mut self) -> bool {
        if self.subscription != Subscription::Idle {
            debug!(subscription = ?self.subscription, "reachability tracker already started");
            return false;
        }
        self.subscription = Subscription::Active;
        true
    }

    /// Applies the result of the startup query. A platform failure leaves the
    /// tracker in `Unknown` without raising the problem flag. Dropped once a
    /// subscription event has been applied.
    pub fn apply_initial(&mut self, result: Result<Reachability, ConnectivityError>) {
        if self.subscription == Subscription::Released {
            return;
        }
        if self.streamed {
            debug!(result = ?result, state = %self.state, "initial check superseded by subscription, ignoring");
            return;
        }
        match result {
            Ok(reachability) => self.transition(reachability),
            Err(e) => {
                warn!(error = %e, "initial connectivity check failed");
                self.state = Reachability::Unknown;
            }
        }
    }

    /// Transition on a subscription event. Ignored once released.
    pub fn apply(&mut self, reachability: Reachability) {
        if self.subscription == Subscription::Released {
            debug!(%reachability, "reachability event after release, ignoring");
            return;
        }
        self.streamed = true;
        self.transition(reachability);
    }

    fn transition(&mut self, reachability: Reachability) {
        let was_problem = self.problem;
        // None and Unknown both gate the remote path.
        self.state = reachability;
        self.problem = !reachability.is_connected();

        if was_problem != self.problem {
            info!(state = %self.state, problem = self.problem, "reachability changed");
        } else {
            debug!(state = %self.state, problem = self.problem, "reachability update");
        }
    }

    /// Returns `true` exactly once, when the caller must unsubscribe.
    pub fn release(&mut self) -> bool {
        let was_active = self.subscription == Subscription::Active;
        self.subscription = Subscription::Released;
        was_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let tracker = ReachabilityTracker::new();
        assert_eq!(tracker.state(), Reachability::Unknown);
        assert!(!tracker.has_problem());
        assert!(!tracker.is_subscribed());
    }

    #[test]
    fn test_connected_clears_problem() {
        let mut tracker = ReachabilityTracker::new();
        tracker.start();
        tracker.apply(Reachability::None);
        assert!(tracker.has_problem());

        tracker.apply(Reachability::Mobile);
        assert_eq!(tracker.state(), Reachability::Mobile);
        assert!(!tracker.has_problem());

        tracker.apply(Reachability::Wifi);
        assert_eq!(tracker.state(), Reachability::Wifi);
        assert!(!tracker.has_problem());
    }

    #[test]
    fn test_none_raises_problem() {
        let mut tracker = ReachabilityTracker::new();
        tracker.start();
        tracker.apply(Reachability::None);
        assert_eq!(tracker.state(), Reachability::None);
        assert!(tracker.has_problem());
    }

    #[test]
    fn test_unknown_event_is_treated_as_unreachable() {
        let mut tracker = ReachabilityTracker::new();
        tracker.start();
        tracker.apply(Reachability::Wifi);
        tracker.apply(Reachability::Unknown);
        assert_eq!(tracker.state(), Reachability::Unknown);
        assert!(tracker.has_problem());
    }

    #[test]
    fn test_initial_check_success_applies_transition() {
        let mut tracker = ReachabilityTracker::new();
        tracker.start();
        tracker.apply_initial(Ok(Reachability::None));
        assert!(tracker.has_problem());
    }

    #[test]
    fn test_initial_check_failure_stays_unknown() {
        let mut tracker = ReachabilityTracker::new();
        tracker.start();
        tracker.apply_initial(Err(ConnectivityError::Platform {
            message: "no permission".into(),
        }));
        assert_eq!(tracker.state(), Reachability::Unknown);
        assert!(!tracker.has_problem());
    }

    #[test]
    fn test_start_is_once() {
        let mut tracker = ReachabilityTracker::new();
        assert!(tracker.start());
        assert!(tracker.is_subscribed());
        assert!(!tracker.start());
    }

    #[test]
    fn test_release_is_once() {
        let mut tracker = ReachabilityTracker::new();
        tracker.start();
        assert!(tracker.release());
        assert!(!tracker.release());
        assert!(!tracker.is_subscribed());
    }

    #[test]
    fn test_release_before_start_does_not_unsubscribe() {
        let mut tracker = ReachabilityTracker::new();
        assert!(!tracker.release());
        assert!(!tracker.start());
    }

    #[test]
    fn test_events_after_release_are_ignored() {
        let mut tracker = ReachabilityTracker::new();
        tracker.start();
        tracker.apply(Reachability::Wifi);
        tracker.release();
        tracker.apply(Reachability::None);
        tracker.apply_initial(Ok(Reachability::None));
        assert_eq!(tracker.state(), Reachability::Wifi);
        assert!(!tracker.has_problem());
    }

    mod ordering_tests {
        use super::*;

        #[test]
        fn test_late_initial_check_does_not_clear_problem() {
            let mut tracker = ReachabilityTracker::new();
            tracker.start();
            tracker.apply(Reachability::None);
            tracker.apply_initial(Ok(Reachability::Wifi));
            assert_eq!(tracker.state(), Reachability::None);
            assert!(tracker.has_problem());
        }

        #[test]
        fn test_late_initial_failure_keeps_streamed_state() {
            let mut tracker = ReachabilityTracker::new();
            tracker.start();
            tracker.apply(Reachability::Wifi);
            tracker.apply_initial(Err(ConnectivityError::Platform {
                message: "timeout".into(),
            }));
            assert_eq!(tracker.state(), Reachability::Wifi);
            assert!(!tracker.has_problem());
        }

        #[test]
        fn test_stream_after_initial_check_still_applies() {
            let mut tracker = ReachabilityTracker::new();
            tracker.start();
            tracker.apply_initial(Ok(Reachability::Wifi));
            tracker.apply(Reachability::None);
            assert!(tracker.has_problem());
        }
    }
}
