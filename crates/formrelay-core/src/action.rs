//! Submit action and display method definitions
//!
//! FormRelay classifies every submit-capable control two ways:
//! - SubmitAction: how the browser routes the activated submission
//! - DisplayMethod: whether the control is rendered, disabled, or hidden

use crate::{FormError, FormResult};

/// How an activated submission reaches the server
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SubmitAction {
    /// Submit the enclosing form in place (screen transition)
    #[default]
    Transition,

    /// Clone the form and submit into a newly opened window
    Popup,

    /// Clone the form and submit for a file download response
    Download,
}

impl SubmitAction {
    /// Parse from the template attribute value
    pub fn parse(s: &str) -> FormResult<Self> {
        match s {
            "transition" => Ok(SubmitAction::Transition),
            "popup" => Ok(SubmitAction::Popup),
            "download" => Ok(SubmitAction::Download),
            other => Err(FormError::UnknownSubmitAction(other.to_string())),
        }
    }

    /// Wire name used in the client metadata table
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            SubmitAction::Transition => "transition",
            SubmitAction::Popup => "popup",
            SubmitAction::Download => "download",
        }
    }

    /// Does the client clone form elements into a generated form?
    pub fn uses_generated_form(self) -> bool {
        match self {
            SubmitAction::Transition => false,
            SubmitAction::Popup => true,
            SubmitAction::Download => true,
        }
    }

    /// Does the client open a new viewport before submitting?
    pub fn opens_window(self) -> bool {
        matches!(self, SubmitAction::Popup)
    }
}

/// Tri-state visibility policy for a submission element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DisplayMethod {
    /// Render normally, fully interactive
    #[default]
    Normal,

    /// Render a non-interactive variant (optionally an alternate fragment)
    Disabled,

    /// Suppress the element and its body entirely
    NoDisplay,
}

impl DisplayMethod {
    /// Parse from the template attribute value
    pub fn parse(s: &str) -> FormResult<Self> {
        match s {
            "normal" => Ok(DisplayMethod::Normal),
            "disabled" => Ok(DisplayMethod::Disabled),
            "nodisplay" => Ok(DisplayMethod::NoDisplay),
            other => Err(FormError::UnknownDisplayMethod(other.to_string())),
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMethod::Normal => "normal",
            DisplayMethod::Disabled => "disabled",
            DisplayMethod::NoDisplay => "nodisplay",
        }
    }

    /// Is any markup emitted for the element?
    pub fn renders_element(self) -> bool {
        !matches!(self, DisplayMethod::NoDisplay)
    }

    /// Can the rendered element trigger a submission?
    pub fn is_interactive(self) -> bool {
        matches!(self, DisplayMethod::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_action_roundtrip() {
        for action in [
            SubmitAction::Transition,
            SubmitAction::Popup,
            SubmitAction::Download,
        ] {
            let parsed = SubmitAction::parse(action.as_str()).unwrap();
            assert_eq!(action, parsed);
        }
    }

    #[test]
    fn test_submit_action_unknown() {
        assert!(matches!(
            SubmitAction::parse("teleport"),
            Err(FormError::UnknownSubmitAction(_))
        ));
    }

    #[test]
    fn test_generated_form_usage() {
        assert!(!SubmitAction::Transition.uses_generated_form());
        assert!(SubmitAction::Popup.uses_generated_form());
        assert!(SubmitAction::Download.uses_generated_form());
        assert!(SubmitAction::Popup.opens_window());
        assert!(!SubmitAction::Download.opens_window());
    }

    #[test]
    fn test_display_method_roundtrip() {
        for method in [
            DisplayMethod::Normal,
            DisplayMethod::Disabled,
            DisplayMethod::NoDisplay,
        ] {
            let parsed = DisplayMethod::parse(method.as_str()).unwrap();
            assert_eq!(method, parsed);
        }
    }

    #[test]
    fn test_display_method_rendering() {
        assert!(DisplayMethod::Normal.renders_element());
        assert!(DisplayMethod::Normal.is_interactive());
        assert!(DisplayMethod::Disabled.renders_element());
        assert!(!DisplayMethod::Disabled.is_interactive());
        assert!(!DisplayMethod::NoDisplay.renders_element());
    }
}
