//src/submission.rs
use log::{debug, warn};
use std::fmt::Display;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("A {0} request is already in progress.")]
    AlreadyInFlight(String),
}

/// Short-lived message shown after a submission settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(msg) | Self::Failure(msg) => msg,
        }
    }
}

/// Keeps a single share/send/fetch action from being fired twice while the first is
/// still pending. One guard per action per sheet.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    action: String,
    in_flight: bool,
}

impl SubmissionGuard {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            in_flight: false,
        }
    }

    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// # Errors
    /// Returns `Error::AlreadyInFlight` while an earlier submission has not finished.
    pub fn begin(&mut self) -> Result<(), Error> {
        if self.in_flight {
            return Err(Error::AlreadyInFlight(self.action.clone()));
        }
        self.in_flight = true;
        debug!("Started {}", self.action);
        Ok(())
    }

    /// Clears the in-flight flag and turns the outcome into a notice. A failure is
    /// reported, never propagated.
    pub fn finish<T, E: Display>(&mut self, outcome: Result<T, E>) -> (Option<T>, Notice) {
        self.in_flight = false;
        match outcome {
            Ok(value) => (Some(value), Notice::Success(format!("{} complete", self.action))),
            Err(e) => {
                warn!("{} failed: {e}", self.action);
                (None, Notice::Failure(format!("{} failed: {e}", self.action)))
            }
        }
    }

    /// Drops the pending result when the hosting sheet is closed mid-flight.
    pub fn abandon(&mut self) {
        if self.in_flight {
            debug!("Abandoned {}", self.action);
        }
        self.in_flight = false;
    }
}
