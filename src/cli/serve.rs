// src/cli/serve.rs — `parable serve`

use std::sync::Arc;
use std::time::Duration;

use crate::api::{self, ApiState};
use crate::core::{MessageRouter, SessionStore};
use crate::infra::config::Config;
use crate::provider::openai::OpenAIProvider;

/// How often the idle-session sweeper runs when expiry is enabled.
const SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Build the router and session store, then serve until Ctrl-C.
pub async fn run_serve(config: &Config) -> anyhow::Result<()> {
    // Fails here, before binding, when the API key is missing.
    let provider = OpenAIProvider::from_env(&config.model)?;
    let router = MessageRouter::new(
        Arc::new(provider),
        config.model.model.clone(),
        config.sessions.max_history,
    );

    let store = Arc::new(SessionStore::new());
    let sweeper = config.sessions.idle_timeout_seconds.map(|secs| {
        tracing::info!("sessions expire after {secs}s idle");
        store
            .clone()
            .spawn_sweeper(Duration::from_secs(secs), SWEEP_PERIOD)
    });

    tracing::info!(
        model = %config.model.model,
        max_history = config.sessions.max_history,
        "starting server"
    );

    let state = ApiState::new(config, store, Arc::new(router));
    let result = api::start_server(config, state).await;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    result
}
