//! URL query string as the shared list-view state.
//!
//! Pagination links, sortable headers and the page-size selector all read the
//! current [`QueryState`] and produce the next query string through
//! [`QueryState::modify_params`]. Nothing is cached between requests: the state
//! is rebuilt from the request URL every time.

pub const PAGE_KEY: &str = "page";
pub const SIZE_KEY: &str = "size";
pub const SORT_KEY: &str = "sort";
pub const SEARCH_KEY: &str = "searchTerm";

/// Single mutation applied by [`QueryState::modify_params`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamOp<'a> {
    /// Overwrite (or add) the key with the given value.
    Set(&'a str),
    /// Remove every occurrence of the key.
    Delete,
}

/// Ordered key/value pairs decoded from a URL query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pairs: Vec<(String, String)>,
}

impl QueryState {
    /// Decodes a raw query string (without the leading `?`).
    ///
    /// Malformed input never fails; it yields an empty state instead.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        match serde_html_form::from_str::<Vec<(String, String)>>(raw) {
            Ok(pairs) => Self { pairs },
            Err(err) => {
                log::debug!("Ignoring malformed query string {raw:?}: {err}");
                Self::default()
            }
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces the first occurrence of `key` and drops any later duplicates,
    /// appending the pair when the key is absent.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut replaced = false;
        self.pairs.retain_mut(|(k, v)| {
            if k != key {
                return true;
            }
            if replaced {
                return false;
            }
            *v = value.to_string();
            replaced = true;
            true
        });
        if !replaced {
            self.pairs.push((key.to_string(), value.to_string()));
        }
    }

    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Clones the current parameters, applies one mutation and returns the
    /// serialized result. `self` is left untouched.
    pub fn modify_params(&self, op: ParamOp<'_>, key: &str) -> String {
        let mut next = self.clone();
        match op {
            ParamOp::Set(value) => next.set(key, value),
            ParamOp::Delete => next.delete(key),
        }
        next.to_query_string()
    }

    pub fn to_query_string(&self) -> String {
        serde_html_form::to_string(&self.pairs).unwrap_or_else(|err| {
            log::error!("Failed to serialize query state: {err}");
            String::new()
        })
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Current page when it is a positive integer.
    pub fn page(&self) -> Option<usize> {
        self.get(PAGE_KEY)
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|page| *page > 0)
    }

    /// Requested page size if it is one of `allowed`, otherwise `default`.
    pub fn page_size(&self, allowed: &[usize], default: usize) -> usize {
        self.get(SIZE_KEY)
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|size| allowed.contains(size))
            .unwrap_or(default)
    }

    /// Trimmed, non-empty free-text search term.
    pub fn search_term(&self) -> Option<&str> {
        self.get(SEARCH_KEY)
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Joins a path with a serialized query string.
pub fn href(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

#[cfg(feature = "server")]
mod extract {
    use std::future::{Ready, ready};

    use actix_web::dev::Payload;
    use actix_web::{FromRequest, HttpRequest};

    use super::QueryState;

    impl FromRequest for QueryState {
        type Error = actix_web::Error;
        type Future = Ready<Result<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
            ready(Ok(QueryState::parse(req.query_string())))
        }
    }
}
