//! End-to-end integration suite
//!
//! Drives the complete protocol: render pass -> hidden blob -> simulated
//! activation -> next-request restoration, with display control and
//! encryption policy in the loop.

use formrelay_core::{
    AttributeBag, DisplayMethod, FormAggregationContext, HtmlAttr, RequestScope, SubmitAction,
};

use crate::RenderHarness;

/// Render the order form from the harness: a confirm button that must
/// not double-submit and a cancel button that may
pub fn render_order_form(
    harness: &RenderHarness,
    scope: &mut RequestScope,
) -> FormAggregationContext {
    let mut ctx = FormAggregationContext::begin(scope, "orderForm").unwrap();

    let mut attrs = AttributeBag::new();
    attrs.set(HtmlAttr::Name, "confirmBtn");
    harness.render_control(
        &mut ctx,
        &mut attrs,
        SubmitAction::Transition,
        "/order/ORDER_CONFIRM.do",
        false,
        None,
    );
    ctx.clear_current();

    let mut attrs = AttributeBag::new();
    attrs.set(HtmlAttr::Name, "cancelBtn");
    harness.render_control(
        &mut ctx,
        &mut attrs,
        SubmitAction::Transition,
        "/order/ORDER_CANCEL.do",
        true,
        None,
    );
    ctx.clear_current();

    ctx
}
