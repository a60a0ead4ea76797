//! Field values and password visibility owned by a mounted form.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::forms::schema::FormSchema;

/// Submitted form values keyed by field name.
pub type FormData = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    values: FormData,
    password_visible: BTreeMap<String, bool>,
}

impl FormState {
    /// Seeds every named input from its default; password fields start hidden.
    pub fn from_schema(schema: &FormSchema) -> Self {
        let mut state = Self::default();
        for field in schema.leaves() {
            if !field.kind.holds_value() {
                continue;
            }
            let Some(name) = field.name.as_deref() else {
                continue;
            };
            state
                .values
                .insert(name.to_string(), field.initial_value());
            if field.kind == crate::forms::FieldKind::Password {
                state.password_visible.insert(name.to_string(), false);
            }
        }
        state
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn values(&self) -> &FormData {
        &self.values
    }

    /// Text, email, password and textarea changes.
    pub fn on_field_change(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Select changes carry the chosen option id.
    pub fn on_select_change(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Flips a password field between hidden and shown. Names that are not
    /// password fields of the schema are ignored.
    pub fn on_toggle_password(&mut self, name: &str) {
        if let Some(visible) = self.password_visible.get_mut(name) {
            *visible = !*visible;
        }
    }

    pub fn is_password_visible(&self, name: &str) -> bool {
        self.password_visible.get(name).copied().unwrap_or(false)
    }

    /// Names of password fields currently shown in plain text.
    pub fn visible_passwords(&self) -> impl Iterator<Item = &str> {
        self.password_visible
            .iter()
            .filter(|(_, visible)| **visible)
            .map(|(name, _)| name.as_str())
    }

    /// Blanks every known value. Keys and password visibility are kept.
    pub fn on_clear(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
    }

    /// Hands the current values to `submit`.
    pub fn on_submit<F, T>(&self, submit: F) -> T
    where
        F: FnOnce(&FormData) -> T,
    {
        submit(&self.values)
    }
}
