//! HTTP API layer: routes, handlers, middleware and DTOs.

pub mod doc;
pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
