use crate::{LogCrateSink, LogSink};
use std::{
    fmt::{self, Debug},
    sync::Arc,
};

/// Collaborators handed to a repository when it is built.
#[derive(Clone)]
pub struct RepositoryContext {
    pub sink: Arc<dyn LogSink>,
    /// Record a step by step trail of every operation into the sink.
    pub breadcrumbs: bool,
}

impl RepositoryContext {
    pub fn new() -> Self {
        Self {
            sink: Arc::new(LogCrateSink),
            breadcrumbs: false,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn breadcrumbs(mut self, enabled: bool) -> Self {
        self.breadcrumbs = enabled;
        self
    }
}

impl Default for RepositoryContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for RepositoryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryContext")
            .field("breadcrumbs", &self.breadcrumbs)
            .finish_non_exhaustive()
    }
}
