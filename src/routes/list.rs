use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::resource::ResourceRegistry;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::query_state::{QueryState, href};
use crate::repository::http::HttpRepository;
use crate::routes::{base_context, ensure_role, redirect, render_template, service_error_response};
use crate::services::list::load_list_page;
use crate::sorting::cleanup_sort;

#[get("/{resource}")]
pub async fn show_list(
    slug: web::Path<String>,
    query: QueryState,
    user: AuthenticatedUser,
    registry: web::Data<ResourceRegistry>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Err(response) = ensure_role(&user, SERVICE_ACCESS_ROLE, Some("/na")) {
        return response;
    }

    let Some(resource) = registry.get(&slug) else {
        return HttpResponse::NotFound().finish();
    };

    // A blank `sort` is dropped from the URL before anything is fetched.
    if let Some(cleaned) = cleanup_sort(&query) {
        return redirect(&href(&format!("/{}", resource.slug), &cleaned));
    }

    let data = match load_list_page(
        repo.get_ref(),
        &user,
        resource,
        &query,
        server_config.pagination_policy,
    )
    .await
    {
        Ok(data) => data,
        Err(err) => return service_error_response(err, "/"),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        resource.slug.as_str(),
        &server_config.auth_service_url,
    );
    context.insert("page", &data);

    render_template(&tera, "list/index.html", &context)
}
