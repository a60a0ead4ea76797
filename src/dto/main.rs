//! Data for the dashboard home page.

use serde::Serialize;

use crate::domain::resource::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceLink {
    pub slug: String,
    pub title: String,
    pub href: String,
}

impl From<&Resource> for ResourceLink {
    fn from(resource: &Resource) -> Self {
        Self {
            slug: resource.slug.to_string(),
            title: resource.title.clone(),
            href: format!("/{}", resource.slug),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexPageData {
    pub resources: Vec<ResourceLink>,
}
