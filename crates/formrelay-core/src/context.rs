//! Per-form aggregation context
//!
//! One live instance per open form. Submit-capable directives register
//! SubmissionInfo records, input directives register their names, and
//! restoration directives append hidden entries; at form close the hidden
//! codec and the client protocol emitter consume the aggregate.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    AttributeBag, DisplayMethod, FormError, FormResult, HtmlAttr, RequestId, RequestScope,
    SubmissionInfo, SubmitAction,
};

/// Aggregates everything one form contributes to the page
#[derive(Debug)]
pub struct FormAggregationContext {
    form_name: String,
    input_names: HashSet<String>,
    submissions: Vec<SubmissionInfo>,
    submission_names: HashSet<String>,
    /// Parallel to `submissions`; the request id each submission targets
    request_ids: Vec<Option<RequestId>>,
    /// Ordered (name, value) pairs; repeated names are repeated entries
    hidden_entries: Vec<(String, String)>,
    /// Index of the submission currently open for nested parameter
    /// directives
    current: Option<usize>,
}

impl FormAggregationContext {
    /// Open a form. The name must be unique across the whole request,
    /// including nested sub-renders of the same page.
    pub fn begin(scope: &mut RequestScope, form_name: &str) -> FormResult<Self> {
        if !scope.register_form_name(form_name) {
            return Err(FormError::DuplicateFormName(form_name.to_string()));
        }
        Ok(FormAggregationContext {
            form_name: form_name.to_string(),
            input_names: HashSet::new(),
            submissions: Vec::new(),
            submission_names: HashSet::new(),
            request_ids: Vec::new(),
            hidden_entries: Vec::new(),
            current: None,
        })
    }

    pub fn form_name(&self) -> &str {
        &self.form_name
    }

    /// Register an input name; idempotent
    pub fn add_input_name(&mut self, name: &str) {
        self.input_names.insert(name.to_string());
    }

    pub fn has_input_name(&self, name: &str) -> bool {
        self.input_names.contains(name)
    }

    pub fn input_names(&self) -> &HashSet<String> {
        &self.input_names
    }

    /// Register a submission element and make it current.
    ///
    /// If the element's declared `name` attribute is absent, empty, or
    /// already used in this form, a deterministic name
    /// `"<formName>_<ordinal>"` is synthesized (1-based ordinal) and the
    /// attribute is overwritten in place. Returns the synthesized name
    /// only when one was generated.
    #[allow(clippy::too_many_arguments)]
    pub fn add_submission_info(
        &mut self,
        action: SubmitAction,
        attrs: &mut AttributeBag,
        target_uri: &str,
        allow_double_submission: bool,
        request_id: Option<RequestId>,
        popup_window_name: Option<String>,
        popup_option: Option<String>,
        display_method: DisplayMethod,
    ) -> Option<String> {
        let declared = attrs
            .get(HtmlAttr::Name)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let (name, issued) = match declared {
            Some(n) if !self.submission_names.contains(&n) => (n, None),
            _ => {
                let synthesized = format!("{}_{}", self.form_name, self.submissions.len() + 1);
                debug!(form = %self.form_name, name = %synthesized, "synthesized submission name");
                attrs.set(HtmlAttr::Name, synthesized.clone());
                (synthesized.clone(), Some(synthesized))
            }
        };

        self.submission_names.insert(name.clone());
        self.submissions.push(SubmissionInfo::new(
            name,
            action,
            target_uri,
            allow_double_submission,
            popup_window_name,
            popup_option,
            display_method,
        ));
        self.request_ids.push(request_id);
        self.current = Some(self.submissions.len() - 1);
        issued
    }

    /// Append hidden entries, one per value, and register the name as an
    /// input name. Repeated names produce repeated entries (multi-value
    /// hidden fields).
    pub fn add_hidden_entry<I, V>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        for value in values {
            self.hidden_entries.push((name.to_string(), value.into()));
        }
        self.add_input_name(name);
    }

    /// First hidden entry registered under a name (format-spec sidecar
    /// lookup for renamed parameters)
    pub fn hidden_entry(&self, name: &str) -> Option<&str> {
        self.hidden_entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn hidden_entries(&self) -> &[(String, String)] {
        &self.hidden_entries
    }

    pub fn submissions(&self) -> &[SubmissionInfo] {
        &self.submissions
    }

    pub fn submission_names(&self) -> &HashSet<String> {
        &self.submission_names
    }

    /// Request ids parallel to `submissions()`
    pub fn request_ids(&self) -> &[Option<RequestId>] {
        &self.request_ids
    }

    /// Distinct request ids registered by any submission
    pub fn registered_request_ids(&self) -> Vec<&RequestId> {
        let mut seen = HashSet::new();
        self.request_ids
            .iter()
            .flatten()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// The submission currently open for nested parameter directives
    pub fn current_submission(&self) -> Option<&SubmissionInfo> {
        self.current.map(|i| &self.submissions[i])
    }

    /// Mutable access to the open submission; a parameter directive
    /// outside any submission element is a template-author error
    pub fn current_submission_mut(&mut self) -> FormResult<&mut SubmissionInfo> {
        match self.current {
            Some(i) => Ok(&mut self.submissions[i]),
            None => Err(FormError::ParameterOutsideSubmission),
        }
    }

    /// Append a parameter to the open submission
    pub fn add_submission_param(&mut self, name: &str, value: impl Into<String>) -> FormResult<()> {
        self.current_submission_mut()?.add_param(name, value);
        Ok(())
    }

    /// Append a change-param registration to the open submission
    pub fn add_submission_change_param(
        &mut self,
        param_name: &str,
        source_input: &str,
    ) -> FormResult<()> {
        self.current_submission_mut()?
            .add_change_param(param_name, source_input);
        Ok(())
    }

    /// Close the open submission element; subsequent parameter directives
    /// fail until the next submission begins
    pub fn clear_current(&mut self) {
        self.current = None;
    }
}
