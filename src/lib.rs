//! Catalog-driven data access for the furniture store: generic CRUD, foreign-key joins
//! and junction references over SQLite, plus the HTTP surface that exposes them.

pub mod catalog;
pub mod error;
pub mod handlers;
pub mod id;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use catalog::Catalog;
pub use error::{AppError, CatalogError};
pub use id::IdGenerator;
pub use migration::apply_migrations;
pub use model::Record;
pub use routes::{api_routes, app, common_routes};
pub use service::{CrudService, ReferenceService};
pub use settings::Settings;
pub use state::AppState;
pub use store::connect;
