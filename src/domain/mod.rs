//! Domain types shared by the dashboard services.

pub mod auth;
pub mod record;
pub mod resource;
pub mod types;
