//! Shared application state for all routes.

use crate::catalog::Catalog;
use crate::id::IdGenerator;
use crate::service::{CrudService, ReferenceService};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub catalog: Arc<Catalog>,
    pub ids: Arc<IdGenerator>,
}

impl AppState {
    pub fn new(pool: SqlitePool, catalog: Catalog) -> Self {
        AppState {
            pool,
            catalog: Arc::new(catalog),
            ids: Arc::new(IdGenerator::new()),
        }
    }

    pub fn crud(&self) -> CrudService {
        CrudService::new(self.pool.clone(), self.catalog.clone())
    }

    pub fn references(&self) -> ReferenceService {
        ReferenceService::new(self.pool.clone(), self.catalog.clone())
    }
}
