//! Tri-state column sorting encoded in the shared `sort` query parameter.
//!
//! The parameter is a comma-separated list of `column` (ascending) and
//! `-column` (descending) tokens, at most one per column. The same format is
//! forwarded verbatim to the backend API.

use serde::Serialize;

use crate::query_state::{ParamOp, QueryState, SORT_KEY, href};

const DESCENDING_PREFIX: char = '-';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl SortDirection {
    /// Next state of the header toggle: unsorted, ascending, descending, unsorted.
    pub fn next(self) -> Self {
        match self {
            SortDirection::Unsorted => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Unsorted,
        }
    }

    /// Value of the `aria-sort` attribute.
    pub fn aria(self) -> &'static str {
        match self {
            SortDirection::Unsorted => "none",
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

fn base_column(token: &str) -> &str {
    token.strip_prefix(DESCENDING_PREFIX).unwrap_or(token)
}

/// Ordered sort tokens, unique by base column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortList {
    tokens: Vec<String>,
}

impl SortList {
    pub fn parse(raw: &str) -> Self {
        let mut tokens: Vec<String> = Vec::new();
        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let column = base_column(token);
            if column.is_empty() || tokens.iter().any(|t| base_column(t) == column) {
                continue;
            }
            tokens.push(token.to_string());
        }
        Self { tokens }
    }

    pub fn from_query(query: &QueryState) -> Self {
        query.get(SORT_KEY).map(Self::parse).unwrap_or_default()
    }

    pub fn direction(&self, column: &str) -> SortDirection {
        match self.tokens.iter().find(|t| base_column(t) == column) {
            Some(token) if token.starts_with(DESCENDING_PREFIX) => SortDirection::Descending,
            Some(_) => SortDirection::Ascending,
            None => SortDirection::Unsorted,
        }
    }

    /// Advances `column` one step; other entries keep their place.
    pub fn toggle(&mut self, column: &str) {
        let position = self.tokens.iter().position(|t| base_column(t) == column);
        match (self.direction(column), position) {
            (SortDirection::Unsorted, _) => self.tokens.push(column.to_string()),
            (SortDirection::Ascending, Some(index)) => {
                self.tokens[index] = format!("{DESCENDING_PREFIX}{column}");
            }
            (SortDirection::Descending, Some(index)) => {
                self.tokens.remove(index);
            }
            (_, None) => {}
        }
    }

    pub fn to_param(&self) -> String {
        self.tokens.join(",")
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Query string after one click on `column`'s header.
///
/// The new list is committed with `set`; an emptied `sort` is then removed so
/// generated links never carry `sort=`.
pub fn toggle_query(query: &QueryState, column: &str) -> String {
    let mut sort = SortList::from_query(query);
    sort.toggle(column);
    let next = QueryState::parse(&query.modify_params(ParamOp::Set(&sort.to_param()), SORT_KEY));
    cleanup_sort(&next).unwrap_or_else(|| next.to_query_string())
}

/// New query string when `sort` is present but blank.
pub fn cleanup_sort(query: &QueryState) -> Option<String> {
    match query.get(SORT_KEY) {
        Some(raw) if SortList::parse(raw).is_empty() => {
            Some(query.modify_params(ParamOp::Delete, SORT_KEY))
        }
        _ => None,
    }
}

/// Rendered table header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub id: String,
    pub label: String,
    pub sortable: bool,
    pub direction: SortDirection,
    pub aria_sort: &'static str,
    pub href: Option<String>,
}

impl HeaderCell {
    pub fn new(id: &str, label: &str, sortable: bool, query: &QueryState, path: &str) -> Self {
        if !sortable {
            return Self {
                id: id.to_string(),
                label: label.to_string(),
                sortable,
                direction: SortDirection::Unsorted,
                aria_sort: SortDirection::Unsorted.aria(),
                href: None,
            };
        }

        let direction = SortList::from_query(query).direction(id);
        Self {
            id: id.to_string(),
            label: label.to_string(),
            sortable,
            direction,
            aria_sort: direction.aria(),
            href: Some(href(path, &toggle_query(query, id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_follows_prefix() {
        let sort = SortList::parse("name,-email");
        assert_eq!(sort.direction("name"), SortDirection::Ascending);
        assert_eq!(sort.direction("email"), SortDirection::Descending);
        assert_eq!(sort.direction("phone"), SortDirection::Unsorted);
    }

    #[test]
    fn three_clicks_return_to_the_start() {
        let mut sort = SortList::parse("id");

        sort.toggle("name");
        assert_eq!(sort.to_param(), "id,name");
        sort.toggle("name");
        assert_eq!(sort.to_param(), "id,-name");
        sort.toggle("name");
        assert_eq!(sort.to_param(), "id");
    }

    #[test]
    fn toggle_leaves_other_columns_in_place() {
        let mut sort = SortList::parse("-a,b,c");
        sort.toggle("b");
        assert_eq!(sort.to_param(), "-a,-b,c");
        sort.toggle("b");
        assert_eq!(sort.to_param(), "-a,c");
    }

    #[test]
    fn matching_uses_the_whole_column_id() {
        let mut sort = SortList::parse("firstname");
        assert_eq!(sort.direction("name"), SortDirection::Unsorted);

        sort.toggle("name");
        assert_eq!(sort.to_param(), "firstname,name");
    }

    #[test]
    fn parse_drops_duplicates_and_blanks() {
        let sort = SortList::parse("a,,-a, b ,-");
        assert_eq!(sort.tokens(), ["a", "b"]);
    }

    #[test]
    fn cleanup_removes_blank_sort() {
        let query = QueryState::parse("sort=&page=2");
        assert_eq!(cleanup_sort(&query).as_deref(), Some("page=2"));

        let query = QueryState::parse("sort=name&page=2");
        assert_eq!(cleanup_sort(&query), None);

        assert_eq!(cleanup_sort(&QueryState::parse("page=2")), None);
    }

    #[test]
    fn toggle_query_removes_the_last_entry_entirely() {
        let query = QueryState::parse("page=3&sort=-email");
        assert_eq!(toggle_query(&query, "email"), "page=3");
    }

    #[test]
    fn header_cell_for_static_column_has_no_link() {
        let query = QueryState::parse("sort=name");
        let cell = HeaderCell::new("name", "Name", false, &query, "/users");

        assert_eq!(cell.href, None);
        assert_eq!(cell.direction, SortDirection::Unsorted);
    }

    #[test]
    fn header_cell_links_to_the_next_state() {
        let query = QueryState::parse("sort=name");
        let cell = HeaderCell::new("name", "Name", true, &query, "/users");

        assert_eq!(cell.direction, SortDirection::Ascending);
        assert_eq!(cell.aria_sort, "ascending");
        assert_eq!(cell.href.as_deref(), Some("/users?sort=-name"));
    }
}
