use std::sync::Arc;

use anyhow::Result;
use lesson_server::AppState;

use super::ModelArgs;

pub fn run(host: &str, port: u16, model: &ModelArgs) -> Result<()> {
    let settings = model.settings()?;
    let client = model.client()?;
    tracing::info!(
        model = %settings.model,
        temperature = settings.temperature,
        max_tokens = settings.max_tokens,
        base_url = %model.base_url,
        "model settings"
    );

    let state = AppState::new(Arc::new(client), settings);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(lesson_server::serve(state, host, port))
}
