//! Schema-driven forms backing the create and edit screens.

use thiserror::Error;

pub mod render;
pub mod schema;
pub mod state;

pub use render::{FormAction, FormRenderer, FormSubmission, RenderedForm};
pub use schema::{DefaultValue, Field, FieldKind, FieldNode, FormSchema, Scalar};
pub use state::{FormData, FormState};

#[derive(Debug, Error, PartialEq, Eq)]
/// Errors that can occur when interpreting a form schema.
pub enum FormError {
    #[error("unknown field type for field {0:?}")]
    UnknownFieldType(Option<String>),

    #[error("input field labelled {0:?} has no name")]
    MissingName(String),

    #[error("duplicate field name {0:?}")]
    DuplicateName(String),
}
