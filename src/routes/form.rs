use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::resource::{Resource, ResourceRegistry};
use crate::dto::form::FormPageData;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::query_state::{QueryState, href};
use crate::repository::http::HttpRepository;
use crate::routes::{base_context, ensure_role, redirect, render_template, service_error_response};
use crate::services::form::{FormOutcome, delete_record, load_edit_form, load_new_form, submit_form};

/// Hidden field on delete buttons carrying the list query to return to.
const RETURN_KEY: &str = "_return";

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    server_config: &ServerConfig,
    data: &FormPageData,
) -> HttpResponse {
    let mut context = base_context(
        flash_messages,
        user,
        &data.slug,
        &server_config.auth_service_url,
    );
    context.insert("page", data);
    render_template(tera, "form/index.html", &context)
}

fn list_path(resource: &Resource) -> String {
    format!("/{}", resource.slug)
}

#[get("/{resource}/new")]
pub async fn show_new_form(
    slug: web::Path<String>,
    user: AuthenticatedUser,
    registry: web::Data<ResourceRegistry>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(resource) = registry.get(&slug) else {
        return HttpResponse::NotFound().finish();
    };

    match load_new_form(&user, resource) {
        Ok(data) => render_form(&tera, &flash_messages, &user, &server_config, &data),
        Err(err) => service_error_response(err, &list_path(resource)),
    }
}

#[get("/{resource}/{id}/edit")]
pub async fn show_edit_form(
    path: web::Path<(String, String)>,
    user: AuthenticatedUser,
    registry: web::Data<ResourceRegistry>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (slug, id) = path.into_inner();
    let Some(resource) = registry.get(&slug) else {
        return HttpResponse::NotFound().finish();
    };

    match load_edit_form(repo.get_ref(), &user, resource, &id).await {
        Ok(data) => render_form(&tera, &flash_messages, &user, &server_config, &data),
        Err(err) => service_error_response(err, &list_path(resource)),
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_submit(
    slug: &str,
    id: Option<&str>,
    body: &str,
    user: &AuthenticatedUser,
    registry: &ResourceRegistry,
    repo: &HttpRepository,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    if let Err(response) = ensure_role(user, SERVICE_ADMIN_ROLE, Some("/na")) {
        return response;
    }
    let Some(resource) = registry.get(slug) else {
        return HttpResponse::NotFound().finish();
    };

    let posted = QueryState::parse(body);
    match submit_form(repo, user, resource, id, posted.pairs()).await {
        Ok(FormOutcome::Rerender(data)) => {
            render_form(tera, flash_messages, user, server_config, &data)
        }
        Ok(FormOutcome::Saved) => {
            FlashMessage::success(format!("{} saved.", resource.title)).send();
            redirect(&list_path(resource))
        }
        Err(err) => service_error_response(err, &list_path(resource)),
    }
}

#[post("/{resource}/new")]
pub async fn create_record(
    slug: web::Path<String>,
    body: String,
    user: AuthenticatedUser,
    registry: web::Data<ResourceRegistry>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    handle_submit(
        &slug,
        None,
        &body,
        &user,
        &registry,
        &repo,
        &flash_messages,
        &server_config,
        &tera,
    )
    .await
}

#[post("/{resource}/{id}/edit")]
pub async fn update_record(
    path: web::Path<(String, String)>,
    body: String,
    user: AuthenticatedUser,
    registry: web::Data<ResourceRegistry>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (slug, id) = path.into_inner();
    handle_submit(
        &slug,
        Some(&id),
        &body,
        &user,
        &registry,
        &repo,
        &flash_messages,
        &server_config,
        &tera,
    )
    .await
}

#[post("/{resource}/{id}/delete")]
pub async fn remove_record(
    path: web::Path<(String, String)>,
    body: String,
    user: AuthenticatedUser,
    registry: web::Data<ResourceRegistry>,
    repo: web::Data<HttpRepository>,
) -> impl Responder {
    let (slug, id) = path.into_inner();
    let Some(resource) = registry.get(&slug) else {
        return HttpResponse::NotFound().finish();
    };

    let posted = QueryState::parse(&body);
    let back = href(&list_path(resource), posted.get(RETURN_KEY).unwrap_or_default());

    match delete_record(repo.get_ref(), &user, resource, &id).await {
        Ok(()) => {
            FlashMessage::success(format!("{} record deleted.", resource.title)).send();
            redirect(&back)
        }
        Err(err) => service_error_response(err, &back),
    }
}
