//! Form and modal surfaces
//!
//! The controller never touches a document directly. It drives a surface
//! through these traits; the page binding maps them onto the elements below,
//! and `MemoryView` implements them in-process.

use regdesk_rules::FormValues;

/// Element ids the registration markup must provide
pub mod ids {
    //! Element ids
    /// Modal container
    pub const REGISTRATION_MODAL: &str = "registrationModal";
    /// Modal heading
    pub const MODAL_TITLE: &str = "modalTitle";
    /// The form element
    pub const REGISTRATION_FORM: &str = "registrationForm";
    /// Container for generated team-member fields
    pub const TEAM_MEMBERS_SECTION: &str = "teamMembersSection";
    /// Team size selector
    pub const TEAM_SIZE: &str = "teamSize";
}

/// Classes toggled on elements; styling lives with the page
pub mod classes {
    //! Class names
    /// Modal is visible
    pub const ACTIVE: &str = "active";
    /// Control holds an invalid value
    pub const ERROR: &str = "error";
    /// Error message is visible
    pub const SHOW: &str = "show";
    /// Submit control is waiting on a submission
    pub const LOADING: &str = "loading";
}

/// Label shown on the submit control while a submission is in flight
pub const LOADING_LABEL: &str = "Loading...";

/// Id of the error-message element paired with a field
#[inline]
#[must_use]
pub fn error_slot_id(field: &str) -> String {
    format!("{field}-error")
}

/// Kind of form control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// `<input>`
    Input,
    /// `<select>`
    Select,
    /// `<textarea>`
    Textarea,
}

/// Visible state of the submit control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    /// Button label
    pub label: String,
    /// Whether the button is disabled
    pub disabled: bool,
    /// Whether the loading class is set
    pub loading: bool,
}

impl SubmitControl {
    /// Enabled control with `label`
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
            loading: false,
        }
    }
}

/// A registration form: controls, error slots, focus and the submit control
pub trait FormSurface: Send {
    /// Names of every input, select and textarea, in document order
    fn control_names(&self) -> Vec<String>;

    /// Ids of every error-message element
    fn error_slot_ids(&self) -> Vec<String>;

    /// Whether a control named `name` exists
    fn has_control(&self, name: &str) -> bool;

    /// Current value of a control
    fn value(&self, name: &str) -> Option<String>;

    /// Set a control's value; `false` when there is no such control
    fn set_value(&mut self, name: &str, value: &str) -> bool;

    /// Every named control and its current value, in document order
    fn values(&self) -> FormValues;

    /// Set an error slot's text and toggle its `show` class
    ///
    /// `None` empties the slot and hides it. Returns `false` when the slot
    /// does not exist.
    fn set_error_message(&mut self, slot_id: &str, message: Option<&str>) -> bool;

    /// Toggle `aria-invalid` and the `error` class on a control
    fn set_invalid(&mut self, name: &str, invalid: bool) -> bool;

    /// Move focus to a control
    fn focus(&mut self, name: &str) -> bool;

    /// Drop focus from whatever holds it
    fn blur(&mut self);

    /// First enabled `<input>`, in document order
    fn first_enabled_input(&self) -> Option<String>;

    /// Restore every control, the submit control included, to its default
    fn reset(&mut self);

    /// Remove every generated team-member control and its error slot
    fn clear_member_section(&mut self);

    /// Append a team-member control, with an error slot when asked
    fn append_member_control(&mut self, name: &str, kind: ControlKind, with_error_slot: bool);

    /// Submit control state, if the form has one
    fn submit_control(&self) -> Option<SubmitControl>;

    /// Replace the submit control state
    fn set_submit_control(&mut self, control: SubmitControl) -> bool;

    /// Return the submit control to the state the markup gave it
    fn reset_submit_control(&mut self);
}

/// The modal that hosts the form
pub trait ModalSurface: FormSurface {
    /// Whether the modal container exists
    fn has_modal(&self) -> bool;

    /// Set the heading text; `false` when the heading is missing
    fn set_title(&mut self, title: &str) -> bool;

    /// Show or hide the modal (`active` class and `aria-hidden`)
    fn set_open(&mut self, open: bool);

    /// Whether the modal is showing
    fn is_open(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_slot_ids_follow_field_names() {
        assert_eq!(error_slot_id("leaderEmail"), "leaderEmail-error");
        assert_eq!(error_slot_id("member3Name"), "member3Name-error");
    }
}
