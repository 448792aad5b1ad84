//! Worker state definitions for tracking fetch progress
//!
//! This module defines the states a fetch worker moves through while it
//! processes frontier items, and which moves between them are legal.

use std::fmt;

/// Represents the current state of a fetch worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Waiting on the frontier for the next URL
    Idle,

    /// An HTTP request for the dequeued URL is in flight
    Fetching,

    /// Admitting the target of a redirect response
    Redirecting,

    /// Extracting and admitting links from a fetched page
    Extracting,

    /// Cancelled while idle; the worker has exited
    Stopped,
}

impl WorkerState {
    /// Returns true if the worker holds an unacknowledged frontier item
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Fetching | Self::Redirecting | Self::Extracting)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// `Idle -> Fetching -> (Redirecting | Extracting) -> Idle`; a fetch that
    /// yields no follow-up work returns straight to `Idle`. `Stopped` is only
    /// reachable from `Idle`.
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Fetching)
                | (Self::Idle, Self::Stopped)
                | (Self::Fetching, Self::Redirecting)
                | (Self::Fetching, Self::Extracting)
                | (Self::Fetching, Self::Idle)
                | (Self::Redirecting, Self::Idle)
                | (Self::Extracting, Self::Idle)
        )
    }

    /// Short lowercase name, used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Redirecting => "redirecting",
            Self::Extracting => "extracting",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
