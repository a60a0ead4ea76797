//! Server-side models: configuration and the authenticated-user extractor.

pub mod auth;
pub mod config;
