use crate::pipeline::Pipeline;
use std::sync::Arc;

/// Multipart framing allowance on top of the audio size ceiling
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only pipeline; each request runs its own pass through it
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Largest request body accepted before the validator ever sees the upload
    pub fn body_limit(&self) -> usize {
        let limit = self
            .pipeline
            .policy()
            .max_size
            .saturating_add(MULTIPART_OVERHEAD_BYTES);
        usize::try_from(limit).unwrap_or(usize::MAX)
    }
}
