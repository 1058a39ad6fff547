//! Per-control metadata table
//!
//! The single piece of state the browser needs to route an activated
//! submission: target URI, action, double-submission policy, popup
//! fields, and the change-param rename table. Serialized as an array in
//! registration order so the table is deterministic.

use serde::Serialize;

use formrelay_core::{FormAggregationContext, SubmissionInfo};

/// One change-param rename: copy `from`'s current value into `to`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChangeParamEntry {
    pub to: String,
    pub from: String,
}

/// Client-side routing metadata for one registered control
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlMetadata {
    pub name: String,
    pub uri: String,
    pub action: &'static str,
    pub allow_double_submission: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_window_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_option: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub change_params: Vec<ChangeParamEntry>,
}

impl ControlMetadata {
    pub fn from_submission(info: &SubmissionInfo) -> Self {
        ControlMetadata {
            name: info.name().to_string(),
            uri: info.target_uri().to_string(),
            action: info.action().as_str(),
            allow_double_submission: info.allow_double_submission(),
            popup_window_name: info.popup_window_name().map(str::to_string),
            popup_option: info.popup_option().map(str::to_string),
            change_params: info
                .change_params()
                .iter()
                .map(|cp| ChangeParamEntry {
                    to: cp.param_name.clone(),
                    from: cp.source_input.clone(),
                })
                .collect(),
        }
    }
}

/// Metadata for every registered control, in registration order
pub fn metadata_table(ctx: &FormAggregationContext) -> Vec<ControlMetadata> {
    ctx.submissions()
        .iter()
        .map(ControlMetadata::from_submission)
        .collect()
}
