//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (non-empty slugs, sortable column
//! ids, path-safe record ids) so that once a value reaches the domain layer it
//! can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lower-case ASCII letters, digits and hyphens; used in URL paths.
fn check_slug(value: &str) -> Result<(), TypeConstraintError> {
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid && !value.starts_with('-') {
        Ok(())
    } else {
        Err(TypeConstraintError::InvalidValue(format!(
            "slug {value:?} must be lower-case letters, digits and hyphens"
        )))
    }
}

/// A column id travels inside the comma-separated `sort` parameter.
fn check_column(value: &str) -> Result<(), TypeConstraintError> {
    if value.contains(',') || value.starts_with('-') {
        Err(TypeConstraintError::InvalidValue(format!(
            "column id {value:?} must not contain ',' or start with '-'"
        )))
    } else {
        Ok(())
    }
}

fn check_record_id(value: &str) -> Result<(), TypeConstraintError> {
    if value.contains(['/', '?', '#']) {
        Err(TypeConstraintError::InvalidValue(format!(
            "record id {value:?} is not path safe"
        )))
    } else {
        Ok(())
    }
}

/// Macro to generate trimmed, non-empty string newtypes with an extra check.
macro_rules! constrained_string_newtype {
    ($name:ident, $doc:expr, $check:path) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty, validated value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?.into_inner();
                $check(&inner)?;
                Ok(Self(inner))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

constrained_string_newtype!(
    ResourceSlug,
    "URL segment naming a configured resource, e.g. `students`.",
    check_slug
);

constrained_string_newtype!(
    ColumnId,
    "Table column identifier, also used as the sort key sent to the API.",
    check_column
);

constrained_string_newtype!(
    RecordId,
    "Identifier of a record in the backend API.",
    check_record_id
);
