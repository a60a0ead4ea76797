//! Turns a [`FormSchema`] plus its [`FormState`] into a tree the templates can
//! walk, and rebuilds that state from a posted HTML form.

use serde::Serialize;

use crate::forms::schema::{Field, FieldKind, FieldNode, FormSchema, FormTitle, grid_columns};
use crate::forms::state::{FormData, FormState};
use crate::forms::FormError;

/// Form key carrying the pressed button.
pub const ACTION_KEY: &str = "_action";
/// Repeated form key listing password fields shown in plain text.
pub const VISIBLE_KEY: &str = "_visible";

const TOGGLE_PREFIX: &str = "toggle:";

/// Concrete widget a recognised field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Text,
    Email,
    Password,
    Select,
    Textarea,
    Submit,
    Reset,
}

impl Field {
    pub fn widget(&self) -> Result<WidgetKind, FormError> {
        match self.kind {
            FieldKind::Text => Ok(WidgetKind::Text),
            FieldKind::Email => Ok(WidgetKind::Email),
            FieldKind::Password => Ok(WidgetKind::Password),
            FieldKind::Select => Ok(WidgetKind::Select),
            FieldKind::Textarea => Ok(WidgetKind::Textarea),
            FieldKind::Submit => Ok(WidgetKind::Submit),
            FieldKind::Reset => Ok(WidgetKind::Reset),
            FieldKind::Unknown => Err(FormError::UnknownFieldType(self.name.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOption {
    pub id: String,
    pub value: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedField {
    pub widget: WidgetKind,
    /// `type` attribute for `<input>` widgets.
    pub input_type: &'static str,
    pub name: Option<String>,
    pub label: String,
    pub placeholder: Option<String>,
    pub required: bool,
    pub disabled: bool,
    pub read_only: bool,
    pub class_name: Option<String>,
    pub value: String,
    /// Only meaningful for password widgets.
    pub visible: bool,
    /// Label of a `{value, label}` default, shown as the empty select choice.
    pub default_label: Option<String>,
    pub options: Vec<RenderedOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum RenderNode {
    Field(RenderedField),
    Group {
        columns: usize,
        children: Vec<RenderNode>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedForm {
    pub title: Option<FormTitle>,
    pub nodes: Vec<RenderNode>,
    /// Password fields to re-post as `_visible`.
    pub visible: Vec<String>,
}

impl RenderedForm {
    /// Leaf fields in document order.
    pub fn fields(&self) -> Vec<&RenderedField> {
        fn walk<'a>(nodes: &'a [RenderNode], out: &mut Vec<&'a RenderedField>) {
            for node in nodes {
                match node {
                    RenderNode::Field(field) => out.push(field),
                    RenderNode::Group { children, .. } => walk(children, out),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }
}

/// A schema together with the state of one mounted form.
#[derive(Debug, Clone)]
pub struct FormRenderer {
    schema: FormSchema,
    state: FormState,
}

impl FormRenderer {
    pub fn new(schema: FormSchema) -> Self {
        let state = FormState::from_schema(&schema);
        Self { schema, state }
    }

    /// Pairs a schema with state rebuilt from a submission.
    pub fn with_state(schema: FormSchema, state: FormState) -> Self {
        Self { schema, state }
    }

    /// Swaps the schema and re-seeds the state from it.
    pub fn replace_schema(&mut self, schema: FormSchema) {
        self.state = FormState::from_schema(&schema);
        self.schema = schema;
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn render(&self) -> RenderedForm {
        RenderedForm {
            title: self.schema.title.clone(),
            nodes: self.render_nodes(&self.schema.fields),
            visible: self
                .state
                .visible_passwords()
                .map(ToString::to_string)
                .collect(),
        }
    }

    fn render_nodes(&self, nodes: &[FieldNode]) -> Vec<RenderNode> {
        nodes
            .iter()
            .filter_map(|node| match node {
                FieldNode::Group(children) => Some(RenderNode::Group {
                    columns: grid_columns(children.len()),
                    children: self.render_nodes(children),
                }),
                FieldNode::Leaf(field) => match field.widget() {
                    Ok(widget) => Some(RenderNode::Field(self.render_field(field, widget))),
                    Err(err) => {
                        log::debug!("Skipping field: {err}");
                        None
                    }
                },
            })
            .collect()
    }

    fn render_field(&self, field: &Field, widget: WidgetKind) -> RenderedField {
        let name = field.name.as_deref();
        let value = name
            .and_then(|name| self.state.value(name))
            .unwrap_or_default()
            .to_string();
        let visible = name.is_some_and(|name| self.state.is_password_visible(name));
        let input_type = match widget {
            WidgetKind::Password if visible => "text",
            WidgetKind::Password => "password",
            WidgetKind::Email => "email",
            WidgetKind::Submit => "submit",
            WidgetKind::Reset => "reset",
            WidgetKind::Text | WidgetKind::Select | WidgetKind::Textarea => "text",
        };
        let options = field
            .options
            .iter()
            .map(|option| {
                let id = option.id.to_string();
                RenderedOption {
                    selected: id == value,
                    id,
                    value: option.value.clone(),
                }
            })
            .collect();

        RenderedField {
            widget,
            input_type,
            name: field.name.clone(),
            label: field.label.clone(),
            placeholder: field.placeholder.clone(),
            required: field.required,
            disabled: field.disabled,
            read_only: field.read_only,
            class_name: field.class_name.clone(),
            value,
            visible,
            default_label: field
                .default_value
                .as_ref()
                .and_then(|default| default.label())
                .map(ToString::to_string),
            options,
        }
    }
}

/// Button pressed on a posted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Submit,
    Clear,
    TogglePassword(String),
}

impl FormAction {
    /// Missing or unrecognised actions submit.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("submit") => FormAction::Submit,
            Some("clear") => FormAction::Clear,
            Some(other) => match other.strip_prefix(TOGGLE_PREFIX) {
                Some(name) if !name.is_empty() => FormAction::TogglePassword(name.to_string()),
                _ => {
                    log::debug!("Unrecognised form action {other:?}, submitting");
                    FormAction::Submit
                }
            },
        }
    }
}

/// A posted form: state rebuilt from the submitted pairs plus the action.
#[derive(Debug, Clone)]
pub struct FormSubmission {
    pub state: FormState,
    pub action: FormAction,
}

impl FormSubmission {
    pub fn from_pairs(schema: &FormSchema, pairs: &[(String, String)]) -> Self {
        let posted = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let mut state = FormState::from_schema(schema);
        for field in schema.leaves() {
            if !field.kind.holds_value() {
                continue;
            }
            let Some(name) = field.name.as_deref() else {
                continue;
            };
            let Some(value) = posted(name) else {
                continue;
            };
            match field.kind {
                FieldKind::Select => state.on_select_change(name, value),
                _ => state.on_field_change(name, value),
            }
        }

        let is_password = |name: &str| {
            schema
                .find(name)
                .is_some_and(|field| field.kind == FieldKind::Password)
        };
        for (_, name) in pairs.iter().filter(|(k, _)| k == VISIBLE_KEY) {
            if !is_password(name) {
                log::debug!("Ignoring visibility of non-password field {name:?}");
                continue;
            }
            if !state.is_password_visible(name) {
                state.on_toggle_password(name);
            }
        }

        Self {
            state,
            action: FormAction::parse(posted(ACTION_KEY)),
        }
    }

    /// Applies the action. Returns the data to save when the form was submitted.
    pub fn apply(&mut self) -> Option<FormData> {
        match &self.action {
            FormAction::Submit => Some(self.state.on_submit(|data| data.clone())),
            FormAction::Clear => {
                self.state.on_clear();
                None
            }
            FormAction::TogglePassword(name) => {
                self.state.on_toggle_password(name);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema() -> FormSchema {
        serde_json::from_value(json!({
            "title": {"label": "Add teacher"},
            "fields": [
                [
                    {"name": "first", "label": "First"},
                    {"name": "last", "label": "Last"},
                    {"name": "middle", "label": "Middle"},
                    {"name": "title", "label": "Title"}
                ],
                {"type": "password", "name": "pw", "label": "Password"},
                {"type": "hologram", "name": "ghost", "label": "Ghost"},
                {
                    "type": "select",
                    "name": "department",
                    "label": "Department",
                    "defaultValue": {"value": 2, "label": "Choose"},
                    "options": [{"id": 1, "value": "Maths"}, {"id": 2, "value": "Physics"}]
                },
                {"type": "submit", "name": "submit", "label": "Save"}
            ]
        }))
        .expect("valid schema")
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let field = Field {
            kind: FieldKind::Unknown,
            name: Some("ghost".to_string()),
            ..Field::default()
        };
        assert_eq!(
            field.widget(),
            Err(FormError::UnknownFieldType(Some("ghost".to_string())))
        );
    }

    #[test]
    fn render_skips_unknown_fields_and_sizes_groups() {
        let form = FormRenderer::new(schema()).render();

        assert!(matches!(
            &form.nodes[0],
            RenderNode::Group { columns: 5, children } if children.len() == 4
        ));
        let names: Vec<_> = form
            .fields()
            .iter()
            .filter_map(|f| f.name.as_deref())
            .collect();
        assert_eq!(names, vec!["first", "last", "middle", "title", "pw", "department", "submit"]);
    }

    #[test]
    fn select_marks_the_default_option() {
        let form = FormRenderer::new(schema()).render();
        let department = form
            .fields()
            .into_iter()
            .find(|f| f.widget == WidgetKind::Select)
            .cloned()
            .expect("select field");

        assert_eq!(department.value, "2");
        assert_eq!(department.default_label.as_deref(), Some("Choose"));
        assert!(!department.options[0].selected);
        assert!(department.options[1].selected);
    }

    #[test]
    fn password_input_type_follows_visibility() {
        let mut renderer = FormRenderer::new(schema());
        let input_type = |form: &RenderedForm| {
            form.fields()
                .into_iter()
                .find(|f| f.widget == WidgetKind::Password)
                .map(|f| f.input_type)
        };

        assert_eq!(input_type(&renderer.render()), Some("password"));
        renderer.state_mut().on_toggle_password("pw");
        let form = renderer.render();
        assert_eq!(input_type(&form), Some("text"));
        assert_eq!(form.visible, vec!["pw"]);
    }

    #[test]
    fn replace_schema_reseeds_state() {
        let mut renderer = FormRenderer::new(schema());
        renderer.state_mut().on_field_change("first", "Ada");

        renderer.replace_schema(
            serde_json::from_value(json!({"fields": [{"name": "code", "defaultValue": "CS"}]}))
                .expect("valid schema"),
        );

        assert_eq!(renderer.state().value("first"), None);
        assert_eq!(renderer.state().value("code"), Some("CS"));
    }

    #[test]
    fn action_parsing() {
        assert_eq!(FormAction::parse(None), FormAction::Submit);
        assert_eq!(FormAction::parse(Some("clear")), FormAction::Clear);
        assert_eq!(
            FormAction::parse(Some("toggle:pw")),
            FormAction::TogglePassword("pw".to_string())
        );
        assert_eq!(FormAction::parse(Some("toggle:")), FormAction::Submit);
        assert_eq!(FormAction::parse(Some("explode")), FormAction::Submit);
    }

    #[test]
    fn submission_keeps_posted_values_and_visibility() {
        let mut submission = FormSubmission::from_pairs(
            &schema(),
            &pairs(&[
                ("first", "Grace"),
                ("pw", "s3cret"),
                ("department", "1"),
                ("_visible", "pw"),
                ("_action", "clear"),
            ]),
        );

        assert_eq!(submission.state.value("first"), Some("Grace"));
        assert_eq!(submission.state.value("last"), Some(""));
        assert!(submission.state.is_password_visible("pw"));

        assert_eq!(submission.apply(), None);
        assert_eq!(submission.state.value("first"), Some(""));
        assert_eq!(submission.state.value("department"), Some(""));
        assert!(submission.state.is_password_visible("pw"));
    }

    #[test]
    fn visibility_is_only_tracked_for_password_fields() {
        let mut submission = FormSubmission::from_pairs(
            &schema(),
            &pairs(&[
                ("first", "Grace"),
                ("_visible", "first"),
                ("_visible", "ghost"),
                ("_action", "toggle:nope"),
            ]),
        );

        assert_eq!(submission.apply(), None);
        let form = FormRenderer::with_state(schema(), submission.state).render();

        assert!(form.visible.is_empty());
        assert!(form.fields().iter().all(|field| !field.visible));
    }

    #[test]
    fn submit_returns_only_input_values() {
        let mut submission = FormSubmission::from_pairs(
            &schema(),
            &pairs(&[("first", "Grace"), ("submit", "Save"), ("_action", "submit")]),
        );

        let data = submission.apply().expect("submitted data");

        assert_eq!(data.get("first").map(String::as_str), Some("Grace"));
        assert_eq!(data.get("department").map(String::as_str), Some("2"));
        assert!(!data.contains_key("submit"));
        assert!(!data.contains_key("ghost"));
        assert!(!data.contains_key("_action"));
    }
}
