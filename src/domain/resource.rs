//! Configured resources: which API endpoint backs a screen, which columns the
//! table shows and which form creates or edits its records.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::domain::types::{ColumnId, ResourceSlug};
use crate::forms::FormSchema;
use crate::forms::schema::SelectOption;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, PAGE_SIZES};
use crate::query_state::{PAGE_KEY, SEARCH_KEY, SIZE_KEY, SORT_KEY};

/// Errors raised while loading the resource registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse registry: {0}")]
    Json(#[from] serde_json::Error),

    #[error("resource {slug}: {message}")]
    Invalid { slug: String, message: String },

    #[error("duplicate resource slug {0}")]
    DuplicateSlug(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnFormat {
    #[default]
    Text,
    /// ISO timestamps rendered as `YYYY-MM-DD`.
    Date,
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColumnDef {
    /// Dotted path into the record; also the sort key.
    pub id: ColumnId,
    pub label: String,
    #[serde(default = "yes")]
    pub sortable: bool,
    #[serde(default)]
    pub format: ColumnFormat,
}

/// Exact-match filter forwarded to the API as `key=value`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilterDef {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

fn default_key() -> String {
    "id".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub slug: ResourceSlug,
    #[validate(length(min = 1))]
    pub title: String,
    /// Path below the API base url, e.g. `students`.
    #[validate(length(min = 1))]
    pub endpoint: String,
    /// Record field holding the identifier.
    #[serde(default = "default_key")]
    #[validate(length(min = 1))]
    pub key: String,
    #[validate(length(min = 1))]
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub filters: Vec<FilterDef>,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default)]
    pub form: Option<FormSchema>,
}

impl Resource {
    pub fn filter_keys(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|filter| filter.key.as_str())
    }

    fn check(&self) -> Result<(), RegistryError> {
        let invalid = |message: String| RegistryError::Invalid {
            slug: self.slug.to_string(),
            message,
        };

        self.validate().map_err(|err| invalid(err.to_string()))?;

        if !PAGE_SIZES.contains(&self.default_page_size) {
            return Err(invalid(format!(
                "defaultPageSize {} is not one of {PAGE_SIZES:?}",
                self.default_page_size
            )));
        }

        let mut columns = HashSet::new();
        for column in &self.columns {
            if !columns.insert(column.id.as_str()) {
                return Err(invalid(format!("duplicate column {}", column.id)));
            }
        }

        for key in self.filter_keys() {
            if key.trim().is_empty() || [PAGE_KEY, SIZE_KEY, SORT_KEY, SEARCH_KEY].contains(&key) {
                return Err(invalid(format!("filter key {key:?} is reserved or empty")));
            }
        }

        if let Some(form) = &self.form {
            for issue in form.lint() {
                log::warn!("Form of resource {}: {issue}", self.slug);
            }
        }

        Ok(())
    }
}

/// All resources served by the dashboard, in menu order.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: Vec<Resource>,
}

impl ResourceRegistry {
    pub fn new(resources: Vec<Resource>) -> Result<Self, RegistryError> {
        let mut slugs = HashSet::new();
        for resource in &resources {
            resource.check()?;
            if !slugs.insert(resource.slug.as_str()) {
                return Err(RegistryError::DuplicateSlug(resource.slug.to_string()));
            }
        }
        Ok(Self { resources })
    }

    pub fn from_json(raw: &str) -> Result<Self, RegistryError> {
        Self::new(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn get(&self, slug: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.slug.as_str() == slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
