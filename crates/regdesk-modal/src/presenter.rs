//! Error presentation
//!
//! Projects an `ErrorMap` onto a form surface: message text in each
//! `<field>-error` slot, invalid markers on each control, and focus on the
//! first offending control. Missing slots and controls are skipped.

use crate::surface::{error_slot_id, FormSurface};
use regdesk_rules::{ErrorMap, FieldError};

/// Stateless error renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorPresenter;

impl ErrorPresenter {
    /// Remove every error annotation from the form
    pub fn clear<S: FormSurface + ?Sized>(surface: &mut S) {
        for slot in surface.error_slot_ids() {
            surface.set_error_message(&slot, None);
        }
        for name in surface.control_names() {
            surface.set_invalid(&name, false);
        }
    }

    /// Replace every annotation with `errors` and focus the first error
    pub fn display<S: FormSurface + ?Sized>(errors: &ErrorMap, surface: &mut S) {
        Self::clear(surface);

        for (field, error) in errors.iter() {
            Self::annotate(field, error, surface);
        }

        if let Some(first) = errors.fields().find(|field| surface.has_control(field)) {
            let first = first.to_string();
            surface.focus(&first);
        }
    }

    /// Set or clear the annotation of a single field
    ///
    /// Fields without an error slot are left untouched.
    pub fn apply_field<S: FormSurface + ?Sized>(
        field: &str,
        error: Option<&FieldError>,
        surface: &mut S,
    ) {
        let message = error.map(ToString::to_string);
        if surface.set_error_message(&error_slot_id(field), message.as_deref()) {
            surface.set_invalid(field, error.is_some());
        }
    }

    fn annotate<S: FormSurface + ?Sized>(field: &str, error: &FieldError, surface: &mut S) {
        let message = error.to_string();
        surface.set_error_message(&error_slot_id(field), Some(&message));
        surface.set_invalid(field, true);
    }
}
