pub mod config;
pub mod db;
pub mod enrich;
pub mod entities;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod provider;
pub mod repository;
pub mod routes;
pub mod templates;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{enrich::Enricher, provider::MetadataProvider, repository::Repository};

pub struct AppState {
    pub db: DatabaseConnection,
    pub enricher: Enricher,
}

impl AppState {
    pub fn new(db: DatabaseConnection, provider: Arc<dyn MetadataProvider>) -> Self {
        let enricher = Enricher::new(db.clone(), provider);
        Self { db, enricher }
    }

    pub fn repo<K>(&self) -> Repository<K> {
        Repository::new(self.db.clone())
    }
}
