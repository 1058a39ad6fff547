//! Client protocol emission
//!
//! Ordering contract: the per-form metadata block is emitted strictly
//! inside the form's open/close tags, and the ready marker immediately
//! after the close tag. The runtime refuses to activate a control until
//! its form's ready marker has run, so a click can never race script
//! execution.

use formrelay_core::{FormAggregationContext, FormError, FormResult};
use formrelay_hidden::{HiddenStateCodec, HiddenValueCodec};

use crate::metadata_table;

/// Reserved global object; fixed so multiple forms per page share one
/// dispatcher without colliding
pub const GLOBAL_OBJECT: &str = "FormRelay";

/// The page-level dispatcher, emitted once per page
const RUNTIME_SCRIPT: &str = r#"var FormRelay = (function () {
  'use strict';
  var forms = {};

  function register(formName, controls) {
    var byName = {};
    for (var i = 0; i < controls.length; i++) {
      byName[controls[i].name] = controls[i];
    }
    forms[formName] = { controls: byName, ready: false };
  }

  function ready(formName) {
    if (forms[formName]) {
      forms[formName].ready = true;
    }
  }

  function activate(element, formName, controlName) {
    var form = forms[formName];
    if (!form || !form.ready) {
      return false;
    }
    var meta = form.controls[controlName];
    if (!meta) {
      return false;
    }
    if (typeof window.formrelayOnSubmit === 'function'
        && window.formrelayOnSubmit(element, formName, controlName) === false) {
      return false;
    }
    if (!meta.allowDoubleSubmission) {
      element.disabled = true;
      element.onclick = function () { return false; };
    }
    var htmlForm = document.forms[formName];
    htmlForm.elements['fr_submit'].value = controlName;
    applyChangeParams(htmlForm, meta);
    if (meta.action === 'transition') {
      htmlForm.action = meta.uri;
      htmlForm.submit();
    } else {
      submitGenerated(htmlForm, meta);
    }
    return false;
  }

  function applyChangeParams(htmlForm, meta) {
    var list = meta.changeParams || [];
    for (var i = 0; i < list.length; i++) {
      var source = htmlForm.elements[list[i].from];
      if (!source) { continue; }
      var target = htmlForm.elements[list[i].to];
      if (!target) {
        target = document.createElement('input');
        target.type = 'hidden';
        target.name = list[i].to;
        htmlForm.appendChild(target);
      }
      target.value = source.value;
    }
  }

  function submitGenerated(htmlForm, meta) {
    var renames = {};
    var list = meta.changeParams || [];
    for (var i = 0; i < list.length; i++) {
      renames[list[i].from] = list[i].to;
    }
    var generated = document.createElement('form');
    generated.method = htmlForm.method || 'post';
    generated.action = meta.uri;
    for (var j = 0; j < htmlForm.elements.length; j++) {
      var el = htmlForm.elements[j];
      if (!el.name) { continue; }
      if ((el.type === 'checkbox' || el.type === 'radio') && !el.checked) { continue; }
      var clone = document.createElement('input');
      clone.type = 'hidden';
      clone.name = renames[el.name] || el.name;
      clone.value = el.value;
      generated.appendChild(clone);
    }
    if (meta.action === 'popup') {
      var windowName = meta.popupWindowName || '_blank';
      window.open('', windowName, meta.popupOption || '');
      generated.target = windowName;
    }
    document.body.appendChild(generated);
    generated.submit();
    document.body.removeChild(generated);
  }

  return { register: register, ready: ready, activate: activate };
})();
"#;

/// Emits the script contract the browser executes
#[derive(Debug, Default, Clone, Copy)]
pub struct ClientProtocolEmitter;

impl ClientProtocolEmitter {
    pub fn new() -> Self {
        ClientProtocolEmitter
    }

    /// The raw dispatcher script, emitted once per page
    pub fn runtime_script(&self) -> &'static str {
        RUNTIME_SCRIPT
    }

    /// The dispatcher wrapped in a script element
    pub fn runtime_block(&self) -> String {
        format!("<script type=\"text/javascript\">\n{RUNTIME_SCRIPT}</script>")
    }

    /// Per-form metadata block; must land inside the form tags
    pub fn metadata_block(&self, ctx: &FormAggregationContext) -> FormResult<String> {
        let table = metadata_table(ctx);
        let json = serde_json::to_string(&table)
            .map_err(|e| FormError::MetadataSerialization(e.to_string()))?;
        Ok(format!(
            "<script type=\"text/javascript\">{GLOBAL_OBJECT}.register(\"{}\", {json});</script>",
            ctx.form_name()
        ))
    }

    /// Ready marker; must land immediately after the form close tag
    pub fn ready_marker(&self, form_name: &str) -> String {
        format!(
            "<script type=\"text/javascript\">{GLOBAL_OBJECT}.ready(\"{form_name}\");</script>"
        )
    }

    /// The onclick fragment wired onto a registered control
    pub fn activation_attribute(&self, form_name: &str, control_name: &str) -> String {
        format!("return {GLOBAL_OBJECT}.activate(this, '{form_name}', '{control_name}');")
    }

    /// Everything from the form-close boundary on: the two reserved
    /// hidden fields, the metadata block, the close tag, the ready
    /// marker. Encodes the ordering contract in one place.
    pub fn form_epilogue<S: HiddenValueCodec>(
        &self,
        hidden: &HiddenStateCodec<S>,
        ctx: &FormAggregationContext,
    ) -> FormResult<String> {
        let fields = hidden.render_hidden_fields(ctx)?;
        let metadata = self.metadata_block(ctx)?;
        let ready = self.ready_marker(ctx.form_name());
        Ok(format!("{fields}\n{metadata}\n</form>\n{ready}"))
    }
}
