//! Submission records
//!
//! One SubmissionInfo per submit-capable control. The record is created
//! when the control's directive renders and mutated by nested parameter
//! directives until the directive closes; the name is immutable once
//! assigned.

use crate::{DisplayMethod, SubmitAction};

/// A parameter whose value is read from another input at submit time.
///
/// The client protocol copies the source input's current value into the
/// named parameter (and renames cloned fields for popup/download forms).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeParam {
    /// Parameter name sent to the server
    pub param_name: String,
    /// Name of the on-page input supplying the value
    pub source_input: String,
}

/// One record per submit-capable control
#[derive(Clone, Debug)]
pub struct SubmissionInfo {
    name: String,
    action: SubmitAction,
    target_uri: String,
    allow_double_submission: bool,
    popup_window_name: Option<String>,
    popup_option: Option<String>,
    display_method: DisplayMethod,
    /// Ordered multimap: registration order is serialization order
    params: Vec<(String, Vec<String>)>,
    change_params: Vec<ChangeParam>,
}

impl SubmissionInfo {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        action: SubmitAction,
        target_uri: impl Into<String>,
        allow_double_submission: bool,
        popup_window_name: Option<String>,
        popup_option: Option<String>,
        display_method: DisplayMethod,
    ) -> Self {
        SubmissionInfo {
            name: name.into(),
            action,
            target_uri: target_uri.into(),
            allow_double_submission,
            popup_window_name,
            popup_option,
            display_method,
            params: Vec::new(),
            change_params: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> SubmitAction {
        self.action
    }

    pub fn target_uri(&self) -> &str {
        &self.target_uri
    }

    pub fn allow_double_submission(&self) -> bool {
        self.allow_double_submission
    }

    pub fn popup_window_name(&self) -> Option<&str> {
        self.popup_window_name.as_deref()
    }

    pub fn popup_option(&self) -> Option<&str> {
        self.popup_option.as_deref()
    }

    pub fn display_method(&self) -> DisplayMethod {
        self.display_method
    }

    /// Append a parameter value. A repeated name extends the existing
    /// entry; first registration fixes the entry's position.
    pub fn add_param(&mut self, name: &str, value: impl Into<String>) {
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value.into()),
            None => self.params.push((name.to_string(), vec![value.into()])),
        }
    }

    /// Parameters in registration order
    pub fn params(&self) -> &[(String, Vec<String>)] {
        &self.params
    }

    pub fn add_change_param(&mut self, param_name: &str, source_input: &str) {
        self.change_params.push(ChangeParam {
            param_name: param_name.to_string(),
            source_input: source_input.to_string(),
        });
    }

    pub fn change_params(&self) -> &[ChangeParam] {
        &self.change_params
    }
}
