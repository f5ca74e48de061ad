//! State shared by every handler.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::pipeline::Pipeline;

#[derive(Clone)]
pub struct AppState {
    /// Prompt -> completion -> parse
    pub pipeline: Arc<Pipeline>,

    /// Curated, daily and related invocations
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>, catalog: Arc<Catalog>) -> Self {
        Self { pipeline, catalog }
    }
}
