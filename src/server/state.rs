//! Shared server state

use std::time::Instant;

use crate::pipeline::InferencePipeline;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pipeline over the shared trained artifacts
    pub pipeline: InferencePipeline,
    started: Instant,
}

impl AppState {
    /// Create state around a pipeline
    pub fn new(pipeline: InferencePipeline) -> Self {
        Self { pipeline, started: Instant::now() }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
