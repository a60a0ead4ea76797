//! Envelopes exchanged with the backend REST API.

use serde::Deserialize;

use crate::domain::record::{Record, RecordPage};
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// `{success, message?, data?}` wrapper around every API answer.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Payload of a successful answer, which may be empty.
    pub fn into_result(self) -> RepositoryResult<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(RepositoryError::Rejected(
                self.message
                    .unwrap_or_else(|| "request rejected".to_string()),
            ))
        }
    }

    /// Payload of a successful answer that must carry data.
    pub fn into_data(self) -> RepositoryResult<T> {
        self.into_result()?
            .ok_or_else(|| RepositoryError::Decode("response carries no data".to_string()))
    }
}

/// `data` of a list answer.
#[derive(Debug, Default, Deserialize)]
pub struct ListData {
    #[serde(default)]
    pub result: Vec<Record>,
    #[serde(default)]
    pub meta: ListMeta,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListMeta {
    #[serde(rename = "totalPage", default)]
    pub total_page: Option<usize>,
}

impl From<ListData> for RecordPage {
    fn from(data: ListData) -> Self {
        RecordPage {
            items: data.result,
            total_pages: data.meta.total_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_yields_a_record_page() {
        let raw = r#"{"success": true, "data": {"result": [{"id": 1}], "meta": {"totalPage": 4}}}"#;
        let envelope: ApiEnvelope<ListData> = serde_json::from_str(raw).expect("valid json");

        let page: RecordPage = envelope.into_data().expect("data").into();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages, Some(4));
    }

    #[test]
    fn missing_meta_leaves_total_unknown() {
        let raw = r#"{"success": true, "data": {"result": []}}"#;
        let envelope: ApiEnvelope<ListData> = serde_json::from_str(raw).expect("valid json");

        let page: RecordPage = envelope.into_data().expect("data").into();

        assert_eq!(page.total_pages, None);
    }

    #[test]
    fn unsuccessful_envelope_is_rejected() {
        let raw = r#"{"success": false, "message": "Email already taken"}"#;
        let envelope: ApiEnvelope<Record> = serde_json::from_str(raw).expect("valid json");

        match envelope.into_data() {
            Err(RepositoryError::Rejected(message)) => assert_eq!(message, "Email already taken"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn delete_answer_may_omit_data() {
        let envelope: ApiEnvelope<Record> =
            serde_json::from_str(r#"{"success": true}"#).expect("valid json");
        assert!(matches!(envelope.into_result(), Ok(None)));
    }
}
