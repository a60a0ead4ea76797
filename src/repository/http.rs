//! [`RecordReader`]/[`RecordWriter`] backed by the university REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::record::{Record, RecordPage};
use crate::domain::types::RecordId;
use crate::dto::api::{ApiEnvelope, ListData};
use crate::forms::FormData;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ListQuery, RecordReader, RecordWriter};

#[derive(Debug, Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: String,
}

impl HttpRepository {
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str, id: Option<&RecordId>) -> String {
        let endpoint = endpoint.trim_matches('/');
        match id {
            Some(id) => format!("{}/{endpoint}/{id}", self.base_url),
            None => format!("{}/{endpoint}", self.base_url),
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> RepositoryResult<ApiEnvelope<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(RepositoryError::NotFound);
        }
        if !status.is_success() {
            let message = serde_json::from_str::<ApiEnvelope<Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or(body);
            return Err(RepositoryError::Http {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl RecordReader for HttpRepository {
    async fn list_records(&self, token: &str, query: &ListQuery) -> RepositoryResult<RecordPage> {
        let request = self
            .client
            .get(self.url(&query.endpoint, None))
            .bearer_auth(token)
            .query(&query.to_params());
        let data = self.send::<ListData>(request).await?.into_data()?;
        Ok(data.into())
    }

    async fn get_record(
        &self,
        token: &str,
        endpoint: &str,
        id: &RecordId,
    ) -> RepositoryResult<Record> {
        let request = self.client.get(self.url(endpoint, Some(id))).bearer_auth(token);
        self.send(request).await?.into_data()
    }
}

#[async_trait]
impl RecordWriter for HttpRepository {
    async fn create_record(
        &self,
        token: &str,
        endpoint: &str,
        data: &FormData,
    ) -> RepositoryResult<Record> {
        let request = self
            .client
            .post(self.url(endpoint, None))
            .bearer_auth(token)
            .json(data);
        let created: Option<Record> = self.send(request).await?.into_result()?;
        Ok(created.unwrap_or_default())
    }

    async fn update_record(
        &self,
        token: &str,
        endpoint: &str,
        id: &RecordId,
        data: &FormData,
    ) -> RepositoryResult<Record> {
        let request = self
            .client
            .patch(self.url(endpoint, Some(id)))
            .bearer_auth(token)
            .json(data);
        let updated: Option<Record> = self.send(request).await?.into_result()?;
        Ok(updated.unwrap_or_default())
    }

    async fn delete_record(
        &self,
        token: &str,
        endpoint: &str,
        id: &RecordId,
    ) -> RepositoryResult<()> {
        let request = self
            .client
            .delete(self.url(endpoint, Some(id)))
            .bearer_auth(token);
        self.send::<Value>(request).await?.into_result()?;
        Ok(())
    }
}
