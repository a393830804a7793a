//! crates/instructor_core/src/confirm.rs
//!
//! An explicit pending-confirmation state. Destructive actions (delete, reset)
//! are parked here until the user answers yes or no.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Confirmed,
    Declined,
}

/// A parked action together with the question shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation<A> {
    pub prompt: &'static str,
    pub action: A,
}

/// Holds at most one pending confirmation.
#[derive(Debug, Clone)]
pub struct ConfirmationGate<A> {
    pending: Option<Confirmation<A>>,
}

impl<A> Default for ConfirmationGate<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> ConfirmationGate<A> {
    /// Parks `action`. A newer request replaces an unanswered one.
    pub fn request(&mut self, prompt: &'static str, action: A) -> &Confirmation<A> {
        self.pending.insert(Confirmation { prompt, action })
    }

    pub fn pending(&self) -> Option<&Confirmation<A>> {
        self.pending.as_ref()
    }

    /// Answers the pending question. Returns the action only when confirmed;
    /// the gate is empty afterwards either way.
    pub fn resolve(&mut self, decision: Decision) -> Option<A> {
        let pending = self.pending.take()?;
        match decision {
            Decision::Confirmed => Some(pending.action),
            Decision::Declined => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_request_yields_action_once() {
        let mut gate = ConfirmationGate::default();
        gate.request("Sure?", 7);
        assert_eq!(gate.resolve(Decision::Confirmed), Some(7));
        assert_eq!(gate.resolve(Decision::Confirmed), None);
    }

    #[test]
    fn declined_request_is_dropped() {
        let mut gate = ConfirmationGate::default();
        gate.request("Sure?", "delete");
        assert_eq!(gate.resolve(Decision::Declined), None);
        assert!(gate.pending().is_none());
    }

    #[test]
    fn newer_request_replaces_older() {
        let mut gate = ConfirmationGate::default();
        gate.request("first", 1);
        gate.request("second", 2);
        assert_eq!(gate.pending().map(|c| c.prompt), Some("second"));
        assert_eq!(gate.resolve(Decision::Confirmed), Some(2));
    }
}
