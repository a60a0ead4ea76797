use crate::SERVICE_ACCESS_ROLE;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::resource::ResourceRegistry;
use crate::dto::main::{IndexPageData, ResourceLink};
use crate::services::{ServiceError, ServiceResult};

/// Lists the configured resources for the dashboard home page.
pub fn load_index_page(
    user: &AuthenticatedUser,
    registry: &ResourceRegistry,
) -> ServiceResult<IndexPageData> {
    if !user.has_role(SERVICE_ACCESS_ROLE) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(IndexPageData {
        resources: registry.iter().map(ResourceLink::from).collect(),
    })
}
