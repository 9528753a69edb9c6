use crate::job::JobRegistry;
use crate::notify::CompletionNotifier;
use crate::pipeline::PipelineExecutor;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<JobRegistry>,
    pub executor: Arc<PipelineExecutor>,
    pub notifier: Arc<CompletionNotifier>,
}

impl AppState {
    pub fn new(
        registry: Arc<JobRegistry>,
        executor: Arc<PipelineExecutor>,
        notifier: Arc<CompletionNotifier>,
    ) -> Self {
        Self {
            registry,
            executor,
            notifier,
        }
    }
}
