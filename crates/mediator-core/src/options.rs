//! Behaviour switches for signal resolution and dispatch.

use serde::{Deserialize, Serialize};

/// What happens when a signal reaches no director.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnmatchedPolicy {
    /// Unhandled signals are a no-op.
    #[default]
    Silent,
    /// Unhandled signals fail with [`SignalError::NoHandler`](crate::SignalError::NoHandler).
    Strict,
}

/// Arguments produced for a bare handler name.
///
/// A missing or falsy event (`null`, `false`, `0`, `""`) produces no
/// arguments under either shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventArgs {
    /// `[event]` when an event is present.
    #[default]
    Event,
    /// `[event, event.target]` when an event is present.
    EventAndTarget,
}

/// Options carried by a [`Mediator`](crate::Mediator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalOptions {
    /// Zero-match behaviour.
    #[serde(default)]
    pub unmatched: UnmatchedPolicy,

    /// Argument shape for bare handler names.
    #[serde(default)]
    pub event_args: EventArgs,

    /// Reject `name` + `args` definitions whose args are falsy.
    ///
    /// Kept on by default: `0`, `""`, `false` and `null` do not qualify as
    /// arguments and the definition is reported invalid.
    #[serde(default = "default_reject_falsy_args")]
    pub reject_falsy_args: bool,
}

impl Default for SignalOptions {
    fn default() -> Self {
        Self {
            unmatched: UnmatchedPolicy::default(),
            event_args: EventArgs::default(),
            reject_falsy_args: default_reject_falsy_args(),
        }
    }
}

impl SignalOptions {
    /// Sets the zero-match policy.
    pub fn unmatched(mut self, policy: UnmatchedPolicy) -> Self {
        self.unmatched = policy;
        self
    }

    /// Sets the argument shape for bare names.
    pub fn event_args(mut self, event_args: EventArgs) -> Self {
        self.event_args = event_args;
        self
    }

    /// Sets whether falsy `args` are rejected.
    pub fn reject_falsy_args(mut self, reject: bool) -> Self {
        self.reject_falsy_args = reject;
        self
    }
}

fn default_reject_falsy_args() -> bool {
    true
}
