//! Declarative form layout.
//!
//! A schema is a title plus a tree of fields: a JSON object is a field, a JSON
//! array is a sub-grid of its children. Nesting depth is unbounded.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::forms::FormError;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FormSchema {
    #[serde(default)]
    pub title: Option<FormTitle>,
    pub fields: Vec<FieldNode>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FormTitle {
    pub label: String,
    #[serde(default)]
    pub align: TitleAlign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FieldNode {
    Group(Vec<FieldNode>),
    Leaf(Field),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Password,
    Select,
    Textarea,
    Submit,
    Reset,
    #[serde(other)]
    Unknown,
}

impl FieldKind {
    /// Kinds that own a value in the form state.
    pub fn holds_value(self) -> bool {
        matches!(
            self,
            FieldKind::Text
                | FieldKind::Email
                | FieldKind::Password
                | FieldKind::Select
                | FieldKind::Textarea
        )
    }
}

/// Scalar carried by defaults and option identifiers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Converts a JSON scalar; arrays, objects and null yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Scalar::Int)
                .or_else(|| n.as_f64().map(Scalar::Float)),
            Value::String(s) => Some(Scalar::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

/// `defaultValue`: either a bare scalar or `{value, label?}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Labeled {
        #[serde(default)]
        value: Option<Scalar>,
        #[serde(default)]
        label: Option<String>,
    },
    Raw(Scalar),
}

impl DefaultValue {
    /// Initial form-state value; the label is display-only.
    pub fn seed(&self) -> String {
        match self {
            DefaultValue::Labeled { value, .. } => {
                value.as_ref().map(ToString::to_string).unwrap_or_default()
            }
            DefaultValue::Raw(scalar) => scalar.to_string(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            DefaultValue::Labeled { label, .. } => label.as_deref(),
            DefaultValue::Raw(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SelectOption {
    pub id: Scalar,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<DefaultValue>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub read_only: bool,
}

impl Field {
    pub fn new(kind: FieldKind, name: &str, label: &str) -> Self {
        Self {
            kind,
            name: Some(name.to_string()),
            label: label.to_string(),
            ..Self::default()
        }
    }

    /// Seed for the form state: `defaultValue.value`, the bare default, or `""`.
    pub fn initial_value(&self) -> String {
        self.default_value
            .as_ref()
            .map(DefaultValue::seed)
            .unwrap_or_default()
    }
}

/// Sub-grid column count for a group of `len` children.
///
/// Four children get five columns and five get four; other sizes outside
/// `1..=6` stack in one column.
pub fn grid_columns(len: usize) -> usize {
    match len {
        1 => 1,
        2 => 2,
        3 => 3,
        4 => 5,
        5 => 4,
        6 => 6,
        _ => 1,
    }
}

impl FormSchema {
    /// Leaf fields in document order, descending into groups.
    pub fn leaves(&self) -> Vec<&Field> {
        fn walk<'a>(nodes: &'a [FieldNode], out: &mut Vec<&'a Field>) {
            for node in nodes {
                match node {
                    FieldNode::Leaf(field) => out.push(field),
                    FieldNode::Group(children) => walk(children, out),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.fields, &mut out);
        out
    }

    pub fn find(&self, name: &str) -> Option<&Field> {
        self.leaves()
            .into_iter()
            .find(|field| field.name.as_deref() == Some(name))
    }

    /// Schema problems that make form state ambiguous. Rendering still works;
    /// later duplicates simply overwrite earlier ones.
    pub fn lint(&self) -> Vec<FormError> {
        let mut seen = HashSet::new();
        let mut issues = Vec::new();
        for field in self.leaves() {
            if !field.kind.holds_value() {
                continue;
            }
            match field.name.as_deref() {
                None | Some("") => issues.push(FormError::MissingName(field.label.clone())),
                Some(name) => {
                    if !seen.insert(name) {
                        issues.push(FormError::DuplicateName(name.to_string()));
                    }
                }
            }
        }
        issues
    }

    /// Copy of the schema whose input defaults come from an existing record.
    ///
    /// Only scalar record values are used; password fields keep no default.
    pub fn with_record_defaults(&self, record: &Map<String, Value>) -> Self {
        fn seed(nodes: &mut [FieldNode], record: &Map<String, Value>) {
            for node in nodes {
                match node {
                    FieldNode::Group(children) => seed(children, record),
                    FieldNode::Leaf(field) => {
                        if !field.kind.holds_value() || field.kind == FieldKind::Password {
                            continue;
                        }
                        let value = field
                            .name
                            .as_deref()
                            .and_then(|name| record.get(name))
                            .and_then(Scalar::from_json);
                        if let Some(value) = value {
                            field.default_value = Some(DefaultValue::Raw(value));
                        }
                    }
                }
            }
        }

        let mut schema = self.clone();
        seed(&mut schema.fields, record);
        schema
    }
}
