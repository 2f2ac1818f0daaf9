//! Results of operations that degrade instead of failing
//!
//! Formatting and annotation sit on the query response path and must always
//! produce something displayable. `Outcome` carries that value together with
//! whether it is the full result or a fallback, so callers can tell
//! "fully attributed" apart from "evidence unavailable".

/// A value that is either the complete result or a degraded fallback
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation succeeded
    Complete(T),
    /// The operation failed; `value` is the least-informative safe output
    Degraded { value: T, reason: String },
}

impl<T> Outcome<T> {
    /// Build an outcome from a fallible computation and its fallback value
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(value) => Outcome::Complete(value),
            Err(e) => Outcome::Degraded {
                value: fallback(),
                reason: e.to_string(),
            },
        }
    }

    /// Whether this outcome is a fallback
    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    /// Borrow the carried value
    pub fn value(&self) -> &T {
        match self {
            Outcome::Complete(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    /// Why the outcome degraded, if it did
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Complete(_) => None,
            Outcome::Degraded { reason, .. } => Some(reason),
        }
    }

    /// Take the carried value, discarding the status
    pub fn into_inner(self) -> T {
        match self {
            Outcome::Complete(value) | Outcome::Degraded { value, .. } => value,
        }
    }
}
