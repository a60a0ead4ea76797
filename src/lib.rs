//! Server-rendered administration dashboard for a university REST API.
//!
//! The `data` feature exposes the list and form core (query state, pagination,
//! sorting, schema-driven forms, resource registry, repository traits); the
//! `server` feature adds the Actix-web application on top.

pub mod domain;
pub mod dto;
pub mod forms;
pub mod pagination;
pub mod query_state;
pub mod repository;
pub mod sorting;

#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

pub const SERVICE_ACCESS_ROLE: &str = "dashboard";
pub const SERVICE_ADMIN_ROLE: &str = "dashboard_admin";

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use std::time::Duration;

    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::domain::resource::ResourceRegistry;
    use crate::middleware::RedirectUnauthorized;
    use crate::models::config::ServerConfig;
    use crate::repository::http::HttpRepository;
    use crate::routes::form::{
        create_record, remove_record, show_edit_form, show_new_form, update_record,
    };
    use crate::routes::list::show_list;
    use crate::routes::main::{logout, not_assigned, show_index};

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let registry = ResourceRegistry::load(&server_config.resources_path).map_err(|e| {
            std::io::Error::other(format!("Failed to load resource registry: {e}"))
        })?;
        log::info!("Loaded {} resources", registry.len());

        let repo = HttpRepository::new(
            &server_config.api_base_url,
            Duration::from_secs(server_config.api_timeout_secs),
        )
        .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;

        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::derive_from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        let signin_url = format!(
            "{}/auth/signin",
            server_config.auth_service_url.trim_end_matches('/')
        );
        let registry = web::Data::new(registry);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(Some(format!(".{}", server_config.domain)))
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(not_assigned)
                .service(
                    web::scope("")
                        .wrap(RedirectUnauthorized::to(&signin_url))
                        .service(show_index)
                        .service(logout)
                        .service(show_new_form)
                        .service(create_record)
                        .service(show_edit_form)
                        .service(update_record)
                        .service(remove_record)
                        .service(show_list),
                )
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(registry.clone())
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
