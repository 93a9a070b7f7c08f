//! Library Catalog Server
//!
//! Authors own collections of books. The catalog is served as a REST JSON
//! API over a SQLite database; every mutation goes through a unit of work
//! that commits author and book changes in one transaction.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
