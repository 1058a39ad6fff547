//! Prior-value lookup
//!
//! Input directives restoring their previous value across a
//! confirmation/re-display cycle ask this collaborator rather than the
//! raw request, so the backing store can be swapped (request params,
//! session snapshot, test fixture).

use formrelay_core::RequestScope;

/// Backing store for restoring inputs
pub trait PriorValueLookup {
    /// Values previously submitted under a name; `None` when the name
    /// was never submitted (distinct from submitted-empty)
    fn prior_values(&self, name: &str) -> Option<&[String]>;

    /// First prior value, the common single-valued case
    fn prior_value(&self, name: &str) -> Option<&str> {
        self.prior_values(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

impl PriorValueLookup for RequestScope {
    fn prior_values(&self, name: &str) -> Option<&[String]> {
        if self.has_param(name) {
            Some(self.param_values(name))
        } else {
            None
        }
    }
}
