//! In-process modal surface
//!
//! Mirrors the registration markup closely enough to drive the controller
//! without a browser: named controls in document order, `<field>-error`
//! slots, a submit button, the modal container and its heading.

use crate::surface::{
    error_slot_id, ControlKind, FormSurface, ModalSurface, SubmitControl,
};
use indexmap::IndexMap;
use regdesk_rules::{fields, FormValues};

/// Label of the standard submit button
pub const SUBMIT_LABEL: &str = "Submit Registration";

#[derive(Debug, Clone)]
struct Control {
    kind: ControlKind,
    value: String,
    default_value: String,
    disabled: bool,
    invalid: bool,
    generated: bool,
}

impl Control {
    fn new(kind: ControlKind, default_value: &str, generated: bool) -> Self {
        Self {
            kind,
            value: default_value.to_string(),
            default_value: default_value.to_string(),
            disabled: false,
            invalid: false,
            generated,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    text: String,
    shown: bool,
    generated: bool,
}

/// Registration modal held in memory
#[derive(Debug, Clone)]
pub struct MemoryView {
    controls: IndexMap<String, Control>,
    slots: IndexMap<String, Slot>,
    focused: Option<String>,
    submit: Option<SubmitControl>,
    pristine_submit: Option<SubmitControl>,
    title: Option<String>,
    has_modal: bool,
    open: bool,
}

impl MemoryView {
    /// Modal with a heading and an empty form
    #[must_use]
    pub fn new() -> Self {
        Self {
            controls: IndexMap::new(),
            slots: IndexMap::new(),
            focused: None,
            submit: None,
            pristine_submit: None,
            title: Some(String::new()),
            has_modal: true,
            open: false,
        }
    }

    /// The standard registration form: leader fields, team name, a team
    /// size selector defaulting to `1`, error slots and a submit button
    #[must_use]
    pub fn registration_form() -> Self {
        let mut view = Self::new();
        for field in [
            fields::LEADER_NAME,
            fields::LEADER_EMAIL,
            fields::LEADER_PHONE,
            fields::UNIVERSITY,
            fields::FACULTY,
            fields::TEAM_NAME,
        ] {
            view = view.with_control(field, ControlKind::Input).with_error_slot(field);
        }
        view.with_control_default(fields::TEAM_SIZE, ControlKind::Select, "1")
            .with_error_slot(fields::TEAM_SIZE)
            .with_submit(SUBMIT_LABEL)
    }

    /// Add a control with an empty default
    #[must_use]
    pub fn with_control(self, name: &str, kind: ControlKind) -> Self {
        self.with_control_default(name, kind, "")
    }

    /// Add a control with a default value
    #[must_use]
    pub fn with_control_default(mut self, name: &str, kind: ControlKind, default: &str) -> Self {
        self.controls
            .insert(name.to_string(), Control::new(kind, default, false));
        self
    }

    /// Add the error slot for `field`
    #[must_use]
    pub fn with_error_slot(mut self, field: &str) -> Self {
        self.slots.insert(error_slot_id(field), Slot::default());
        self
    }

    /// Add a submit button
    #[must_use]
    pub fn with_submit(mut self, label: &str) -> Self {
        self.submit = Some(SubmitControl::new(label));
        self.pristine_submit.clone_from(&self.submit);
        self
    }

    /// Disable a control
    #[must_use]
    pub fn with_disabled(mut self, name: &str) -> Self {
        if let Some(control) = self.controls.get_mut(name) {
            control.disabled = true;
        }
        self
    }

    /// Drop the modal heading
    #[must_use]
    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    /// Drop the modal container
    #[must_use]
    pub fn without_modal(mut self) -> Self {
        self.has_modal = false;
        self
    }

    /// Set every named value that has a matching control
    pub fn fill(&mut self, values: &FormValues) {
        for (name, value) in values.iter() {
            self.set_value(name, value);
        }
    }

    /// Heading text, if the heading exists
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Text of a field's error slot
    #[must_use]
    pub fn error_text(&self, field: &str) -> Option<&str> {
        self.slots.get(&error_slot_id(field)).map(|s| s.text.as_str())
    }

    /// Whether a field's error slot is showing
    #[must_use]
    pub fn is_error_shown(&self, field: &str) -> bool {
        self.slots
            .get(&error_slot_id(field))
            .is_some_and(|s| s.shown)
    }

    /// Whether a control is marked invalid
    #[must_use]
    pub fn is_invalid(&self, name: &str) -> bool {
        self.controls.get(name).is_some_and(|c| c.invalid)
    }

    /// Fields currently showing an error, in document order
    #[must_use]
    pub fn shown_errors(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.shown)
            .filter_map(|(id, _)| id.strip_suffix("-error").map(str::to_string))
            .collect()
    }

    /// Control holding focus
    #[must_use]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Names of generated team-member controls
    #[must_use]
    pub fn member_control_names(&self) -> Vec<String> {
        self.controls
            .iter()
            .filter(|(_, c)| c.generated)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Kind of a control
    #[must_use]
    pub fn control_kind(&self, name: &str) -> Option<ControlKind> {
        self.controls.get(name).map(|c| c.kind)
    }
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSurface for MemoryView {
    fn control_names(&self) -> Vec<String> {
        self.controls.keys().cloned().collect()
    }

    fn error_slot_ids(&self) -> Vec<String> {
        self.slots.keys().cloned().collect()
    }

    fn has_control(&self, name: &str) -> bool {
        self.controls.contains_key(name)
    }

    fn value(&self, name: &str) -> Option<String> {
        self.controls.get(name).map(|c| c.value.clone())
    }

    fn set_value(&mut self, name: &str, value: &str) -> bool {
        match self.controls.get_mut(name) {
            Some(control) => {
                control.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn values(&self) -> FormValues {
        self.controls
            .iter()
            .map(|(name, c)| (name.as_str(), c.value.as_str()))
            .collect()
    }

    fn set_error_message(&mut self, slot_id: &str, message: Option<&str>) -> bool {
        match self.slots.get_mut(slot_id) {
            Some(slot) => {
                slot.text = message.unwrap_or_default().to_string();
                slot.shown = message.is_some();
                true
            }
            None => false,
        }
    }

    fn set_invalid(&mut self, name: &str, invalid: bool) -> bool {
        match self.controls.get_mut(name) {
            Some(control) => {
                control.invalid = invalid;
                true
            }
            None => false,
        }
    }

    fn focus(&mut self, name: &str) -> bool {
        if self.controls.contains_key(name) {
            self.focused = Some(name.to_string());
            true
        } else {
            false
        }
    }

    fn blur(&mut self) {
        self.focused = None;
    }

    fn first_enabled_input(&self) -> Option<String> {
        self.controls
            .iter()
            .find(|(_, c)| c.kind == ControlKind::Input && !c.disabled)
            .map(|(name, _)| name.clone())
    }

    fn reset(&mut self) {
        for control in self.controls.values_mut() {
            control.value.clone_from(&control.default_value);
        }
        self.reset_submit_control();
    }

    fn clear_member_section(&mut self) {
        self.controls.retain(|_, c| !c.generated);
        self.slots.retain(|_, s| !s.generated);
        if self
            .focused
            .as_ref()
            .is_some_and(|name| !self.controls.contains_key(name))
        {
            self.focused = None;
        }
    }

    fn append_member_control(&mut self, name: &str, kind: ControlKind, with_error_slot: bool) {
        self.controls
            .insert(name.to_string(), Control::new(kind, "", true));
        if with_error_slot {
            self.slots.insert(
                error_slot_id(name),
                Slot {
                    generated: true,
                    ..Slot::default()
                },
            );
        }
    }

    fn submit_control(&self) -> Option<SubmitControl> {
        self.submit.clone()
    }

    fn set_submit_control(&mut self, control: SubmitControl) -> bool {
        match &mut self.submit {
            Some(submit) => {
                *submit = control;
                true
            }
            None => false,
        }
    }

    fn reset_submit_control(&mut self) {
        self.submit.clone_from(&self.pristine_submit);
    }
}

impl ModalSurface for MemoryView {
    fn has_modal(&self) -> bool {
        self.has_modal
    }

    fn set_title(&mut self, title: &str) -> bool {
        match &mut self.title {
            Some(heading) => {
                *heading = title.to_string();
                true
            }
            None => false,
        }
    }

    fn set_open(&mut self, open: bool) {
        if self.has_modal {
            self.open = open;
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_form_layout() {
        let view = MemoryView::registration_form();
        assert_eq!(view.first_enabled_input().as_deref(), Some("leaderName"));
        assert_eq!(view.value("teamSize").as_deref(), Some("1"));
        assert_eq!(view.control_kind("teamSize"), Some(ControlKind::Select));
        assert_eq!(view.submit_control().unwrap().label, SUBMIT_LABEL);
        assert!(view.error_slot_ids().contains(&"teamName-error".to_string()));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut view = MemoryView::registration_form();
        view.set_value("teamName", "Otters");
        view.set_value("teamSize", "3");
        view.reset();
        assert_eq!(view.value("teamName").as_deref(), Some(""));
        assert_eq!(view.value("teamSize").as_deref(), Some("1"));
    }

    #[test]
    fn reset_restores_the_submit_control() {
        let mut view = MemoryView::registration_form();
        view.set_submit_control(SubmitControl {
            label: "Loading...".into(),
            disabled: true,
            loading: true,
        });
        view.reset();
        assert_eq!(view.submit_control(), Some(SubmitControl::new(SUBMIT_LABEL)));
    }

    #[test]
    fn member_section_is_removable() {
        let mut view = MemoryView::registration_form();
        view.append_member_control("member2Name", ControlKind::Input, true);
        view.append_member_control("member2Faculty", ControlKind::Input, false);
        view.focus("member2Name");
        assert_eq!(view.member_control_names().len(), 2);

        view.clear_member_section();
        assert!(view.member_control_names().is_empty());
        assert!(!view.error_slot_ids().contains(&"member2Name-error".to_string()));
        assert_eq!(view.focused(), None);
    }

    #[test]
    fn disabled_inputs_are_skipped_for_focus() {
        let view = MemoryView::registration_form().with_disabled("leaderName");
        assert_eq!(view.first_enabled_input().as_deref(), Some("leaderEmail"));
    }

    #[test]
    fn missing_heading_and_modal() {
        let mut view = MemoryView::registration_form()
            .without_title()
            .without_modal();
        assert!(!view.set_title("x"));
        view.set_open(true);
        assert!(!view.is_open());
        assert!(!view.has_modal());
    }
}
