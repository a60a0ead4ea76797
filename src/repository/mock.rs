//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::record::{Record, RecordPage};
use crate::domain::types::RecordId;
use crate::forms::FormData;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ListQuery, RecordReader, RecordWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl RecordReader for Repository {
        async fn list_records(&self, token: &str, query: &ListQuery) -> RepositoryResult<RecordPage>;
        async fn get_record(
            &self,
            token: &str,
            endpoint: &str,
            id: &RecordId,
        ) -> RepositoryResult<Record>;
    }

    #[async_trait]
    impl RecordWriter for Repository {
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
        async fn delete_record(
            &self,
            token: &str,
            endpoint: &str,
            id: &RecordId,
        ) -> RepositoryResult<()>;
    }
}
