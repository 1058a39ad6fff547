//! Request-scoped storage for one render pass
//!
//! Everything here lives for exactly one request and is mutated
//! synchronously during the top-to-bottom render: no locking, no sharing.
//! Form-name uniqueness is tracked at request level so nested sub-renders
//! of one page cannot register the same form twice.

use std::collections::{HashMap, HashSet};

/// Per-request storage backing a single synchronous render pass
#[derive(Debug, Default)]
pub struct RequestScope {
    /// Form names registered anywhere in this request
    form_names: HashSet<String>,
    /// Decoded request parameters (restoration source)
    params: HashMap<String, Vec<String>>,
    /// Composite inputs whose key-name list was already written
    composite_keys_written: HashSet<String>,
    /// Reconstructed composite candidate lists, one per input name
    composite_cache: HashMap<String, Vec<String>>,
}

impl RequestScope {
    pub fn new() -> Self {
        RequestScope::default()
    }

    /// Register a form name; false if the name was already taken in this
    /// request (including by a nested sub-render)
    pub fn register_form_name(&mut self, name: &str) -> bool {
        self.form_names.insert(name.to_string())
    }

    pub fn has_form_name(&self, name: &str) -> bool {
        self.form_names.contains(name)
    }

    /// Append one value to a request parameter
    pub fn add_param(&mut self, name: &str, value: impl Into<String>) {
        self.params
            .entry(name.to_string())
            .or_default()
            .push(value.into());
    }

    /// Replace a request parameter wholesale
    pub fn set_param(&mut self, name: &str, values: Vec<String>) {
        self.params.insert(name.to_string(), values);
    }

    /// All values of a parameter; empty when absent
    pub fn param_values(&self, name: &str) -> &[String] {
        self.params.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of a parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Mark a composite input's key-name list as written; true exactly
    /// once per request per input name
    pub fn mark_composite_keys_written(&mut self, input_name: &str) -> bool {
        self.composite_keys_written.insert(input_name.to_string())
    }

    /// Cached composite candidate list for an input, if reconstructed
    pub fn cached_candidates(&self, input_name: &str) -> Option<&[String]> {
        self.composite_cache.get(input_name).map(Vec::as_slice)
    }

    /// Store the reconstructed candidate list for an input
    pub fn cache_candidates(&mut self, input_name: &str, candidates: Vec<String>) {
        self.composite_cache.insert(input_name.to_string(), candidates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_name_uniqueness() {
        let mut scope = RequestScope::new();
        assert!(scope.register_form_name("orderForm"));
        assert!(!scope.register_form_name("orderForm"));
        assert!(scope.register_form_name("searchForm"));
    }

    #[test]
    fn test_param_accumulation() {
        let mut scope = RequestScope::new();
        scope.add_param("item", "a");
        scope.add_param("item", "b");

        assert_eq!(scope.param_values("item"), &["a", "b"]);
        assert_eq!(scope.param("item"), Some("a"));
        assert_eq!(scope.param_values("missing"), &[] as &[String]);
    }

    #[test]
    fn test_composite_key_marker() {
        let mut scope = RequestScope::new();
        assert!(scope.mark_composite_keys_written("rows"));
        assert!(!scope.mark_composite_keys_written("rows"));
    }
}
