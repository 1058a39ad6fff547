//! Display control checkers
//!
//! A checker answers whether an operation currently requires display
//! control (authorization denied, service window closed, feature off).
//! Checkers are injected policy: the resolver treats any failure as "no
//! control needed" and never lets a checker abort rendering.

use std::collections::HashSet;

use formrelay_core::RequestId;

/// Failure raised by a checker; caught and logged by the resolver
pub type CheckerError = Box<dyn std::error::Error + Send + Sync>;

/// Injected policy collaborator for display control.
///
/// Implementations may block on external I/O; the resolver invokes them
/// synchronously and imposes no timeout. Checkers must be pure policy
/// predicates: the resolver short-circuits without calling them when the
/// effective method is `Normal`, so side effects must not be relied on.
pub trait DisplayControlChecker: Send + Sync {
    /// Does the given operation currently require display control?
    fn needs_display_control(&self, request_id: &RequestId) -> Result<bool, CheckerError>;
}

/// Configuration-backed checker holding an explicit controlled set
#[derive(Debug, Default)]
pub struct StaticChecker {
    controlled: HashSet<RequestId>,
}

impl StaticChecker {
    pub fn new<I>(controlled: I) -> Self
    where
        I: IntoIterator<Item = RequestId>,
    {
        StaticChecker {
            controlled: controlled.into_iter().collect(),
        }
    }
}

impl DisplayControlChecker for StaticChecker {
    fn needs_display_control(&self, request_id: &RequestId) -> Result<bool, CheckerError> {
        Ok(self.controlled.contains(request_id))
    }
}
