//! Failure policy for external calls
//!
//! Every call site that talks to a remote service states up front whether a
//! failure should be logged and swallowed or logged and returned.

use std::fmt::Display;

use tracing::{error, warn};

/// What to do when an external call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log at WARN and carry on without a value
    LogAndContinue,
    /// Log at ERROR and hand the error back to the caller
    LogAndAbort,
}

impl FailurePolicy {
    /// Apply the policy to a result
    ///
    /// `Ok(v)` becomes `Ok(Some(v))`. An error becomes `Ok(None)` under
    /// `LogAndContinue` and stays an error under `LogAndAbort`.
    pub fn apply<T, E: Display>(self, context: &str, result: Result<T, E>) -> Result<Option<T>, E> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) => match self {
                Self::LogAndContinue => {
                    warn!(%context, error = %e, "External call failed, continuing");
                    Ok(None)
                }
                Self::LogAndAbort => {
                    error!(%context, error = %e, "External call failed, aborting");
                    Err(e)
                }
            },
        }
    }

    /// Apply `LogAndContinue` and fall back to the type's default value
    pub fn or_default<T: Default, E: Display>(context: &str, result: Result<T, E>) -> T {
        match Self::LogAndContinue.apply(context, result) {
            Ok(Some(value)) => value,
            _ => T::default(),
        }
    }
}
