//! Data handed to the `list/index.html` template.

use serde::Serialize;

use crate::domain::resource::FilterDef;
use crate::pagination::Paginated;
use crate::query_state::{PAGE_KEY, ParamOp, QueryState, SEARCH_KEY, href};
use crate::sorting::HeaderCell;

/// One table row: formatted cells plus per-record links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub id: Option<String>,
    pub cells: Vec<String>,
    pub edit_href: Option<String>,
    pub delete_href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChoice {
    pub value: String,
    pub label: String,
    pub selected: bool,
    pub href: String,
}

/// Filter drop-down. Every choice link sets the filter key; `clear_href`
/// removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterWidget {
    pub key: String,
    pub label: String,
    pub active: Option<String>,
    pub choices: Vec<FilterChoice>,
    pub clear_href: Option<String>,
}

impl FilterWidget {
    pub fn new(filter: &FilterDef, query: &QueryState, path: &str) -> Self {
        let active = query
            .get(&filter.key)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string);
        let choices = filter
            .options
            .iter()
            .map(|option| {
                let value = option.id.to_string();
                FilterChoice {
                    selected: active.as_deref() == Some(value.as_str()),
                    href: href(path, &query.modify_params(ParamOp::Set(&value), &filter.key)),
                    label: option.value.clone(),
                    value,
                }
            })
            .collect();

        Self {
            key: filter.key.clone(),
            label: filter.label.clone(),
            clear_href: active
                .as_ref()
                .map(|_| href(path, &query.modify_params(ParamOp::Delete, &filter.key))),
            active,
            choices,
        }
    }
}

/// Pairs the search form re-posts as hidden inputs so that a new search keeps
/// sort, size and filters but starts from the first page.
pub fn search_hidden_fields(query: &QueryState) -> Vec<(String, String)> {
    query
        .pairs()
        .iter()
        .filter(|(key, _)| key != SEARCH_KEY && key != PAGE_KEY)
        .cloned()
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ListPageData {
    pub slug: String,
    pub title: String,
    /// Path of the list screen, e.g. `/students`.
    pub path: String,
    pub headers: Vec<HeaderCell>,
    pub rows: Paginated<Row>,
    pub search_term: Option<String>,
    pub search_hidden: Vec<(String, String)>,
    pub filters: Vec<FilterWidget>,
    /// Current query string, used to come back after edits.
    pub query: String,
    pub can_edit: bool,
    pub new_href: Option<String>,
}
