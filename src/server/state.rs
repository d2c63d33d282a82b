use std::sync::Arc;

use crate::lodging::{SearchPipeline, StaticCatalog};

/// Shared, read-only request context.
pub struct AppState {
    pub catalog: StaticCatalog,
    pub pipeline: Arc<SearchPipeline>,
}

impl AppState {
    pub fn new(catalog: StaticCatalog, pipeline: SearchPipeline) -> Self {
        Self {
            catalog,
            pipeline: Arc::new(pipeline),
        }
    }
}
