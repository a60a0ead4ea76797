//! Generic list-page controller shared by every resource.

use crate::SERVICE_ACCESS_ROLE;
use crate::SERVICE_ADMIN_ROLE;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::record::{Record, cell, record_id};
use crate::domain::resource::Resource;
use crate::dto::list::{FilterWidget, ListPageData, Row, search_hidden_fields};
use crate::pagination::{PAGE_SIZES, Pager, Paginated, WindowPolicy};
use crate::query_state::QueryState;
use crate::repository::{ListQuery, RecordReader};
use crate::services::{ServiceError, ServiceResult};
use crate::sorting::{HeaderCell, SortList};

/// API request for the list screen described by `query`.
pub fn build_list_query(resource: &Resource, query: &QueryState) -> ListQuery {
    let page = query.page().unwrap_or(1);
    let size = query.page_size(&PAGE_SIZES, resource.default_page_size);
    let mut list_query = ListQuery::new(resource.endpoint.as_str()).paginate(page, size);

    if let Some(term) = query.search_term() {
        list_query = list_query.search(term);
    }

    let sort = SortList::from_query(query);
    if !sort.is_empty() {
        list_query = list_query.sort(sort.to_param());
    }

    for key in resource.filter_keys() {
        if let Some(value) = query.get(key).filter(|value| !value.is_empty()) {
            list_query = list_query.filter(key, value);
        }
    }

    list_query
}

fn build_row(resource: &Resource, record: &Record, can_edit: bool) -> Row {
    let id = record_id(record, &resource.key);
    let cells = resource
        .columns
        .iter()
        .map(|column| cell(record, column.id.as_str(), column.format))
        .collect();
    let links = id.as_ref().filter(|_| can_edit);

    Row {
        edit_href: links
            .filter(|_| resource.form.is_some())
            .map(|id| format!("/{}/{id}/edit", resource.slug)),
        delete_href: links.map(|id| format!("/{}/{id}/delete", resource.slug)),
        id,
        cells,
    }
}

/// Loads one page of `resource` as described by the request query.
pub async fn load_list_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    resource: &Resource,
    query: &QueryState,
    policy: WindowPolicy,
) -> ServiceResult<ListPageData>
where
    R: RecordReader + ?Sized,
{
    if !user.has_role(SERVICE_ACCESS_ROLE) {
        return Err(ServiceError::Unauthorized);
    }

    let list_query = build_list_query(resource, query);
    let page = repo
        .list_records(&user.token, &list_query)
        .await
        .map_err(|err| {
            log::error!("Failed to list {}: {err}", resource.slug);
            ServiceError::from(err)
        })?;

    let path = format!("/{}", resource.slug);
    let can_edit = user.has_role(SERVICE_ADMIN_ROLE);
    let pager = Pager::new(page.total_pages, query).with_policy(policy);
    let page_size = list_query
        .pagination
        .as_ref()
        .map_or(resource.default_page_size, |p| p.per_page);

    let headers = resource
        .columns
        .iter()
        .map(|column| {
            HeaderCell::new(
                column.id.as_str(),
                &column.label,
                column.sortable,
                query,
                &path,
            )
        })
        .collect();
    let rows = page
        .items
        .iter()
        .map(|record| build_row(resource, record, can_edit))
        .collect();
    let filters = resource
        .filters
        .iter()
        .map(|filter| FilterWidget::new(filter, query, &path))
        .collect();

    Ok(ListPageData {
        slug: resource.slug.to_string(),
        title: resource.title.clone(),
        rows: Paginated::new(rows, &pager, query, &path, page_size),
        headers,
        search_term: query.search_term().map(ToString::to_string),
        search_hidden: search_hidden_fields(query),
        filters,
        query: query.to_query_string(),
        can_edit,
        new_href: (can_edit && resource.form.is_some()).then(|| format!("{path}/new")),
        path,
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::record::RecordPage;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn user(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "registrar@example.edu".to_string(),
            name: "Registrar".to_string(),
            roles: roles.iter().map(ToString::to_string).collect(),
            exp: 0,
            token: "jwt".to_string(),
        }
    }

    fn students() -> Resource {
        serde_json::from_value(json!({
            "slug": "students",
            "title": "Students",
            "endpoint": "student",
            "columns": [
                {"id": "name", "label": "Name"},
                {"id": "department.name", "label": "Department", "sortable": false},
                {"id": "createdAt", "label": "Joined", "format": "date"}
            ],
            "filters": [{"key": "level", "label": "Level"}],
            "defaultPageSize": 20,
            "form": {"fields": [{"name": "name", "label": "Name"}]}
        }))
        .expect("valid resource")
    }

    fn student(id: i64, name: &str) -> Record {
        json!({
            "id": id,
            "name": name,
            "department": {"name": "Physics"},
            "createdAt": "2023-10-02T09:00:00Z"
        })
        .as_object()
        .cloned()
        .expect("object")
    }

    #[test]
    fn list_query_carries_state_and_declared_filters() {
        let query = QueryState::parse("page=2&size=50&sort=name,-createdAt&searchTerm=ada&level=300&colour=red");
        let list_query = build_list_query(&students(), &query);

        assert_eq!(list_query.pagination.map(|p| (p.page, p.per_page)), Some((2, 50)));
        assert_eq!(list_query.search.as_deref(), Some("ada"));
        assert_eq!(list_query.sort.as_deref(), Some("name,-createdAt"));
        assert_eq!(list_query.filters, vec![("level".to_string(), "300".to_string())]);
    }

    #[test]
    fn size_falls_back_to_the_resource_default() {
        let list_query = build_list_query(&students(), &QueryState::parse("size=7"));
        assert_eq!(list_query.pagination.map(|p| p.per_page), Some(20));
    }

    #[actix_web::test]
    async fn viewer_without_role_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_list_records().times(0);

        let result = load_list_page(
            &repo,
            &user(&[]),
            &students(),
            &QueryState::default(),
            WindowPolicy::default(),
        )
        .await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[actix_web::test]
    async fn rows_are_projected_onto_columns() {
        let mut repo = MockRepository::new();
        repo.expect_list_records()
            .withf(|token, query| token == "jwt" && query.endpoint == "student")
            .times(1)
            .returning(|_, _| {
                Ok(RecordPage {
                    items: vec![student(1, "Ada"), student(2, "Grace")],
                    total_pages: Some(3),
                })
            });

        let data = load_list_page(
            &repo,
            &user(&[SERVICE_ACCESS_ROLE]),
            &students(),
            &QueryState::parse("sort=name"),
            WindowPolicy::default(),
        )
        .await
        .expect("list page");

        assert_eq!(data.rows.items[0].cells, vec!["Ada", "Physics", "2023-10-02"]);
        assert_eq!(data.rows.items[1].id.as_deref(), Some("2"));
        assert_eq!(data.rows.items[0].edit_href, None);
        assert_eq!(data.rows.total_pages, 3);
        assert_eq!(data.rows.page_size, 20);
        assert_eq!(data.headers[0].href.as_deref(), Some("/students?sort=-name"));
        assert_eq!(data.headers[1].href, None);
        assert!(!data.can_edit);
        assert_eq!(data.new_href, None);
    }

    #[actix_web::test]
    async fn admins_get_edit_links() {
        let mut repo = MockRepository::new();
        repo.expect_list_records().times(1).returning(|_, _| {
            Ok(RecordPage {
                items: vec![student(7, "Ada")],
                total_pages: None,
            })
        });

        let data = load_list_page(
            &repo,
            &user(&[SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE]),
            &students(),
            &QueryState::default(),
            WindowPolicy::default(),
        )
        .await
        .expect("list page");

        let row = &data.rows.items[0];
        assert_eq!(row.edit_href.as_deref(), Some("/students/7/edit"));
        assert_eq!(row.delete_href.as_deref(), Some("/students/7/delete"));
        assert_eq!(data.new_href.as_deref(), Some("/students/new"));
        assert_eq!(data.rows.total_pages, crate::pagination::DEFAULT_TOTAL_PAGES);
    }

    #[actix_web::test]
    async fn repository_failures_surface() {
        let mut repo = MockRepository::new();
        repo.expect_list_records()
            .times(1)
            .returning(|_, _| Err(RepositoryError::Timeout));

        let result = load_list_page(
            &repo,
            &user(&[SERVICE_ACCESS_ROLE]),
            &students(),
            &QueryState::default(),
            WindowPolicy::default(),
        )
        .await;

        assert!(matches!(
            result,
            Err(ServiceError::Repository(RepositoryError::Timeout))
        ));
    }
}
