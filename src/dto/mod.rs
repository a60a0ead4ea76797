//! DTO modules that bridge services with templates and the backend API.

pub mod api;
pub mod form;
pub mod list;
pub mod main;
