//! Render-pass harness
//!
//! Simulates the flow a real page render drives: open a form, resolve
//! each control's display method, register submissions, close the form,
//! and finally play the browser's side of the protocol by posting the
//! blob back into a fresh request scope.

use formrelay_core::{
    AttributeBag, DisplayMethod, FormAggregationContext, FormResult, HtmlAttr,
    PathRequestIdExtractor, RequestId, RequestIdExtractor, RequestScope, SubmitAction,
};
use formrelay_display::{DisplayConfig, DisplayMethodResolver};
use formrelay_hidden::{
    apply_restored, AeadHiddenCodec, EncryptionPolicy, HiddenStateCodec, SUBMIT_NAME_FIELD,
};
use formrelay_script::ClientProtocolEmitter;

/// What the harness hands back for one rendered control
#[derive(Debug)]
pub struct ControlRender {
    /// Final control name (declared or synthesized)
    pub name: String,
    /// Activation handler fragment; `None` for non-interactive controls
    pub onclick: Option<String>,
    /// Resolved display method
    pub method: DisplayMethod,
    /// Synthesized name, when the declared one was absent or taken
    pub issued_name: Option<String>,
}

/// One configured engine instance, shared across simulated requests
pub struct RenderHarness {
    resolver: DisplayMethodResolver,
    hidden: HiddenStateCodec<AeadHiddenCodec>,
    emitter: ClientProtocolEmitter,
    extractor: PathRequestIdExtractor,
}

impl RenderHarness {
    pub fn new(display: DisplayConfig, policy: EncryptionPolicy, secret: &[u8]) -> Self {
        RenderHarness {
            resolver: DisplayMethodResolver::new(display),
            hidden: HiddenStateCodec::new(policy, AeadHiddenCodec::new(secret)),
            emitter: ClientProtocolEmitter::new(),
            extractor: PathRequestIdExtractor,
        }
    }

    /// Engine with every policy at its default: everything Normal,
    /// encryption off
    pub fn permissive(secret: &[u8]) -> Self {
        RenderHarness::new(
            DisplayConfig::default(),
            EncryptionPolicy::disabled(),
            secret,
        )
    }

    pub fn hidden(&self) -> &HiddenStateCodec<AeadHiddenCodec> {
        &self.hidden
    }

    pub fn emitter(&self) -> &ClientProtocolEmitter {
        &self.emitter
    }

    pub fn resolver(&self) -> &DisplayMethodResolver {
        &self.resolver
    }

    /// Render one submit-capable control the way its directive would:
    /// resolve visibility first, register only when the element is
    /// rendered at all, wire the activation handler only when it is
    /// interactive. Returns `None` for a suppressed control.
    pub fn render_control(
        &self,
        ctx: &mut FormAggregationContext,
        attrs: &mut AttributeBag,
        action: SubmitAction,
        uri: &str,
        allow_double_submission: bool,
        override_method: Option<DisplayMethod>,
    ) -> Option<ControlRender> {
        let request_id = self.extractor.extract(uri);
        let method = self.resolver.resolve(request_id.as_ref(), override_method);
        if !method.renders_element() {
            return None;
        }

        let issued_name =
            ctx.add_submission_info(action, attrs, uri, allow_double_submission, request_id, None, None, method);
        let name = attrs
            .get(HtmlAttr::Name)
            .expect("registration always leaves a name")
            .to_string();
        let onclick = method
            .is_interactive()
            .then(|| self.emitter.activation_attribute(ctx.form_name(), &name));

        Some(ControlRender {
            name,
            onclick,
            method,
            issued_name,
        })
    }

    /// Close the form: hidden fields, metadata block, close tag, ready
    /// marker
    pub fn close_form(&self, ctx: &FormAggregationContext) -> FormResult<String> {
        self.emitter.form_epilogue(&self.hidden, ctx)
    }

    /// Play the browser: activate `activated`, post the blob back, and
    /// return the next request's scope with the restored parameters
    /// applied
    pub fn submit(
        &self,
        ctx: &FormAggregationContext,
        activated: &str,
        executing: &RequestId,
    ) -> FormResult<RequestScope> {
        let blob = self.hidden.encode_form(ctx)?;
        let restored = self.hidden.restore(executing, activated, &blob)?;

        let mut scope = RequestScope::new();
        apply_restored(&mut scope, &restored);
        scope.set_param(SUBMIT_NAME_FIELD, vec![activated.to_string()]);
        Ok(scope)
    }
}
