//! HTTP surface: routes, handlers, and server-rendered pages.

pub mod auth_handlers;
pub mod handlers;
pub mod note_handlers;
pub mod pages;
pub mod routes;
