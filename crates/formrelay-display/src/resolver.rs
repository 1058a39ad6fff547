//! Display method resolution
//!
//! Pure decision pipeline: configured default + per-element override +
//! ordered checker list -> tri-state display method. Resolved once per
//! element; the result is stored immutably on the SubmissionInfo.

use tracing::warn;

use formrelay_core::{DisplayMethod, RequestId};

use crate::DisplayControlChecker;

/// Immutable display configuration, constructed at startup and shared
/// read-only across concurrently rendering requests
pub struct DisplayConfig {
    default_method: DisplayMethod,
    checkers: Vec<Box<dyn DisplayControlChecker>>,
}

impl DisplayConfig {
    pub fn new(default_method: DisplayMethod) -> Self {
        DisplayConfig {
            default_method,
            checkers: Vec::new(),
        }
    }

    /// Append a checker; checkers run in registration order
    pub fn with_checker(mut self, checker: Box<dyn DisplayControlChecker>) -> Self {
        self.checkers.push(checker);
        self
    }

    pub fn default_method(&self) -> DisplayMethod {
        self.default_method
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig::new(DisplayMethod::Normal)
    }
}

/// Resolves the display method for one submission element
pub struct DisplayMethodResolver {
    config: DisplayConfig,
}

impl DisplayMethodResolver {
    pub fn new(config: DisplayConfig) -> Self {
        DisplayMethodResolver { config }
    }

    /// Resolve the display method for a control targeting `request_id`,
    /// with an optional per-element override.
    ///
    /// - No request id: the control addresses no routed operation, so no
    ///   policy applies and the result is `Normal` unconditionally.
    /// - Effective method `Normal` (override or default): short-circuit to
    ///   `Normal` without invoking any checker. The observable checker
    ///   call count is part of the contract.
    /// - Otherwise the first checker answering "control needed" wins and
    ///   the effective method is returned; a failing checker is logged and
    ///   treated as "no control needed".
    pub fn resolve(
        &self,
        request_id: Option<&RequestId>,
        override_method: Option<DisplayMethod>,
    ) -> DisplayMethod {
        let Some(request_id) = request_id else {
            return DisplayMethod::Normal;
        };

        let effective = override_method.unwrap_or(self.config.default_method);
        if effective == DisplayMethod::Normal {
            return DisplayMethod::Normal;
        }

        for checker in &self.config.checkers {
            match checker.needs_display_control(request_id) {
                Ok(true) => return effective,
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        request_id = %request_id,
                        error = %e,
                        "display control checker failed, treating as no control needed"
                    );
                }
            }
        }
        DisplayMethod::Normal
    }
}
