//! Hidden state round trip - form aggregation to wire and back
//!
//! The encode side gathers a form's hidden entries, one activation entry
//! per submission, and each submission's params under scoped names; the
//! decode side validates the executing operation against the embedded id
//! list and fans only the activated submission's params back out.

use formrelay_core::{FormAggregationContext, FormError, FormResult, RequestId, RequestScope};

use crate::{EncryptionPolicy, HiddenParameterSet, HiddenValueCodec, PlainHiddenCodec};

/// Hidden field carrying the encoded state blob
pub const HIDDEN_STATE_FIELD: &str = "fr_hidden";

/// Hidden field the client protocol fills with the activated submission's
/// name; always emitted empty
pub const SUBMIT_NAME_FIELD: &str = "fr_submit";

/// Blob entry mapping an activation key to the submission's own name
pub const SUBMIT_ENTRY_PREFIX: &str = "fr_submit_";

/// Blob entry prefix scoping a param to its submission. The separator is
/// a control character so arbitrary submission and param names cannot
/// collide with the scheme; scoped keys never leave the blob.
pub const SCOPED_PARAM_PREFIX: &str = "fr_param\u{1}";

/// Separator between the submission and param components of a scoped key
pub const SCOPED_PARAM_SEP: char = '\u{1}';

/// Two-sided hidden state codec: policy decides between the plain path
/// and the injected secure codec, identically on encode and decode
pub struct HiddenStateCodec<S> {
    policy: EncryptionPolicy,
    secure: S,
    plain: PlainHiddenCodec,
}

impl<S: HiddenValueCodec> HiddenStateCodec<S> {
    pub fn new(policy: EncryptionPolicy, secure: S) -> Self {
        HiddenStateCodec {
            policy,
            secure,
            plain: PlainHiddenCodec,
        }
    }

    pub fn policy(&self) -> &EncryptionPolicy {
        &self.policy
    }

    /// Build the ordered hidden parameter set for a form: hidden entries
    /// in registration order, then per submission (in registration order)
    /// the activation entry followed by its scoped params.
    pub fn gather(ctx: &FormAggregationContext) -> HiddenParameterSet {
        let mut set = HiddenParameterSet::new();

        for (name, value) in ctx.hidden_entries() {
            set.append(name, value.clone());
        }

        for submission in ctx.submissions() {
            let name = submission.name();
            set.append(&format!("{SUBMIT_ENTRY_PREFIX}{name}"), name);
            for (param, values) in submission.params() {
                set.append_all(&scoped_param_key(name, param), values.iter().cloned());
            }
        }

        set
    }

    /// Encode a form's aggregated state into the blob text
    pub fn encode_form(&self, ctx: &FormAggregationContext) -> FormResult<String> {
        let set = Self::gather(ctx);
        let ids: Vec<RequestId> = ctx
            .registered_request_ids()
            .into_iter()
            .cloned()
            .collect();

        let id_refs: Vec<&RequestId> = ids.iter().collect();
        if self.policy.needs_encryption(&id_refs) {
            self.secure.encode(&ids, &set)
        } else {
            self.plain.encode(&ids, &set)
        }
    }

    /// Render the two reserved hidden fields for the form epilogue.
    /// Exactly these two fields are always emitted, blob first.
    pub fn render_hidden_fields(&self, ctx: &FormAggregationContext) -> FormResult<String> {
        let blob = self.encode_form(ctx)?;
        Ok(format!(
            "<input type=\"hidden\" name=\"{HIDDEN_STATE_FIELD}\" value=\"{blob}\" />\n\
             <input type=\"hidden\" name=\"{SUBMIT_NAME_FIELD}\" value=\"\" />"
        ))
    }

    /// Decode a blob arriving on the next request.
    ///
    /// `executing` is the operation now running (selects the plain or
    /// secure path, mirroring the encode decision); `activated` is the
    /// submission name posted in the submit-name field. The executing id
    /// must appear in the embedded id list and the activated name must
    /// have been registered at encode time; both checks treat mismatch as
    /// tampering. The result contains the plain entries plus the
    /// activated submission's params under their ordinary names.
    pub fn restore(
        &self,
        executing: &RequestId,
        activated: &str,
        blob: &str,
    ) -> FormResult<HiddenParameterSet> {
        let secure = self.policy.encrypts() && !self.policy.is_exempt(executing);
        let (ids, set) = if secure {
            self.secure.decode(blob)?
        } else {
            self.plain.decode(blob)?
        };

        if !ids.contains(executing) {
            return Err(FormError::MalformedHiddenState(
                "executing request id not present in hidden state".into(),
            ));
        }

        let activation_key = format!("{SUBMIT_ENTRY_PREFIX}{activated}");
        let registered = set
            .get(&activation_key)
            .and_then(|values| values.first())
            .is_some_and(|v| v == activated);
        if !registered {
            return Err(FormError::MalformedHiddenState(
                "activated submission was not registered".into(),
            ));
        }

        let scoped_prefix = format!("{SCOPED_PARAM_PREFIX}{activated}{SCOPED_PARAM_SEP}");
        let mut restored = HiddenParameterSet::new();
        for (name, values) in set.iter() {
            if let Some(param) = name.strip_prefix(&scoped_prefix) {
                restored.append_all(param, values.iter().cloned());
            } else if !name.starts_with(SUBMIT_ENTRY_PREFIX)
                && !name.starts_with(SCOPED_PARAM_PREFIX)
            {
                restored.append_all(name, values.iter().cloned());
            }
        }
        Ok(restored)
    }
}

/// Blob key scoping one submission param
fn scoped_param_key(submission: &str, param: &str) -> String {
    format!("{SCOPED_PARAM_PREFIX}{submission}{SCOPED_PARAM_SEP}{param}")
}

/// Write restored entries into the request scope so ordinary input
/// processing (prior-value lookup, composite expansion) sees them as
/// request parameters
pub fn apply_restored(scope: &mut RequestScope, restored: &HiddenParameterSet) {
    for (name, values) in restored.iter() {
        scope.set_param(name, values.to_vec());
    }
}
