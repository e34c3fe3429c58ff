use std::sync::Arc;

use crate::domain::{
    collection::registry::SchemaRegistry,
    common::{VellumConfig, services::Service},
};
use crate::infrastructure::{
    db::{
        postgres::{Postgres, PostgresConfig},
        schema_sync,
    },
    document::repositories::PostgresDocumentRepository,
};

pub type VellumService = Service<PostgresDocumentRepository>;

/// Connect to the database, bring the registered collections' tables up to
/// date and assemble the service aggregate.
pub async fn create_service(
    config: VellumConfig,
    registry: SchemaRegistry,
) -> Result<VellumService, anyhow::Error> {
    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        config.database.username,
        config.database.password,
        config.database.host,
        config.database.port,
        config.database.name
    );

    let postgres = Postgres::new(PostgresConfig { database_url }).await?;
    let registry = Arc::new(registry);

    schema_sync::ensure_collections(&postgres.get_db(), &registry).await?;

    let repository = PostgresDocumentRepository::new(postgres.get_db(), registry.clone());

    Ok(Service::new(repository, registry, config.localization))
}
