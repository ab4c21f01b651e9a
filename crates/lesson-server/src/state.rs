use std::sync::Arc;

use lesson_core::ModelSettings;
use lesson_llm::ChatModel;

/// Shared application state passed to all route handlers.
///
/// Built once at startup; handlers only read it.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn ChatModel>,
    pub settings: Arc<ModelSettings>,
}

impl AppState {
    pub fn new(model: Arc<dyn ChatModel>, settings: ModelSettings) -> Self {
        Self {
            model,
            settings: Arc::new(settings),
        }
    }
}
