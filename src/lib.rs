//! omnicache
//!
//! Expiry-consistent key-value cache over memory, Redis and PostgreSQL
//! backends, served through one HTTP API.

use shadow_rs::shadow;
shadow!(build);

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod models;
pub mod schema;
pub mod server;
pub mod state;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
