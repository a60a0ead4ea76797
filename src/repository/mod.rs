use async_trait::async_trait;

use crate::domain::record::{Record, RecordPage};
use crate::domain::types::RecordId;
use crate::forms::FormData;
use crate::query_state::{PAGE_KEY, SEARCH_KEY, SORT_KEY};
use crate::repository::errors::RepositoryResult;

pub mod errors;
#[cfg(feature = "server")]
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

/// Page-size parameter understood by the backend API.
pub const LIMIT_KEY: &str = "limit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// Parameters of one list request against a resource endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub endpoint: String,
    pub search: Option<String>,
    /// Raw `sort` value, forwarded as is.
    pub sort: Option<String>,
    pub filters: Vec<(String, String)>,
    pub pagination: Option<Pagination>,
}

impl ListQuery {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            search: None,
            sort: None,
            filters: Vec::new(),
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }

    /// Query-string pairs sent to the API.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(Pagination { page, per_page }) = &self.pagination {
            params.push((PAGE_KEY.to_string(), page.to_string()));
            params.push((LIMIT_KEY.to_string(), per_page.to_string()));
        }
        if let Some(term) = &self.search {
            params.push((SEARCH_KEY.to_string(), term.clone()));
        }
        if let Some(sort) = &self.sort {
            params.push((SORT_KEY.to_string(), sort.clone()));
        }
        params.extend(self.filters.iter().cloned());
        params
    }
}

/// Read access to resource records. `token` is the caller's bearer token.
#[async_trait]
pub trait RecordReader: Send + Sync {
    async fn list_records(&self, token: &str, query: &ListQuery) -> RepositoryResult<RecordPage>;
    async fn get_record(&self, token: &str, endpoint: &str, id: &RecordId)
    -> RepositoryResult<Record>;
}

#[async_trait]
pub trait RecordWriter: Send + Sync {
    async fn create_record(
        &self,
        token: &str,
        endpoint: &str,
        data: &FormData,
    ) -> RepositoryResult<Record>;
    async fn update_record(
        &self,
        token: &str,
        endpoint: &str,
        id: &RecordId,
        data: &FormData,
    ) -> RepositoryResult<Record>;
    async fn delete_record(&self, token: &str, endpoint: &str, id: &RecordId)
    -> RepositoryResult<()>;
}
