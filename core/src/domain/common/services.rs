use std::sync::Arc;

use crate::domain::{
    collection::registry::SchemaRegistry, common::LocalizationConfig,
    document::ports::DocumentRepository,
};

/// Application service aggregate. Domain service traits are implemented on
/// this struct, one module per vertical.
#[derive(Debug, Clone)]
pub struct Service<D>
where
    D: DocumentRepository,
{
    pub(crate) document_repository: D,
    pub(crate) registry: Arc<SchemaRegistry>,
    pub(crate) localization: LocalizationConfig,
}

impl<D> Service<D>
where
    D: DocumentRepository,
{
    pub fn new(
        document_repository: D,
        registry: Arc<SchemaRegistry>,
        localization: LocalizationConfig,
    ) -> Self {
        Self {
            document_repository,
            registry,
            localization,
        }
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub fn localization(&self) -> &LocalizationConfig {
        &self.localization
    }
}
