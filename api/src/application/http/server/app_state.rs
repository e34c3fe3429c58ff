use std::sync::Arc;

use vellum_core::{application::VellumService, domain::collection::registry::SchemaRegistry};

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: VellumService,
    pub registry: Arc<SchemaRegistry>,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: VellumService) -> Self {
        let registry = service.registry().clone();
        Self {
            args,
            service,
            registry,
        }
    }
}
