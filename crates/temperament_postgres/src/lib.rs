//! PostgreSQL adapter for the temperament test.
//!
//! Implements the `temperament_core` port traits over a shared `PgPool`
//! and provides the reference-data import routines used by the admin CLI.

pub mod database;
pub mod import;
pub mod store;

use std::sync::Arc;

use sqlx::PgPool;

pub use database::{connect, run_migrations, DatabaseConfig};
pub use store::{PgReferenceStore, PgResultStore, PgTemplateStore};

/// All Postgres-backed stores over one pool.
pub struct PgStores {
    pub results: Arc<PgResultStore>,
    pub references: Arc<PgReferenceStore>,
    pub templates: Arc<PgTemplateStore>,
}

impl PgStores {
    pub fn new(pool: PgPool) -> Self {
        Self {
            results: Arc::new(PgResultStore::new(pool.clone())),
            references: Arc::new(PgReferenceStore::new(pool.clone())),
            templates: Arc::new(PgTemplateStore::new(pool)),
        }
    }
}
