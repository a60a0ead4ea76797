//! Data handed to the `form/index.html` template.

use serde::Serialize;

use crate::forms::RenderedForm;

#[derive(Debug, Serialize)]
pub struct FormPageData {
    pub slug: String,
    pub title: String,
    pub form: RenderedForm,
    /// Target of the form's `POST`.
    pub action_url: String,
    pub record_id: Option<String>,
    pub cancel_href: String,
    /// Problems found with the last submission.
    pub errors: Vec<String>,
}
