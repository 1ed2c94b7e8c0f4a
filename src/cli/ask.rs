// src/cli/ask.rs — `parable ask`: route one message from the terminal

use std::sync::Arc;

use crate::core::{MessageRouter, Platform, Session};
use crate::infra::config::Config;
use crate::infra::errors::ParableError;
use crate::provider::openai::OpenAIProvider;

pub async fn run_ask(config: &Config, message: &str, platform: Option<&str>) -> anyhow::Result<()> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ParableError::InvalidInput("message required".into()).into());
    }

    let mut session = Session::new();
    if let Some(p) = platform {
        let parsed = Platform::parse(p).ok_or_else(|| {
            ParableError::InvalidInput(format!("unknown platform '{p}', use iphone or android"))
        })?;
        session.set_platform(parsed);
    }

    let provider = OpenAIProvider::from_env(&config.model)?;
    let router = MessageRouter::new(
        Arc::new(provider),
        config.model.model.clone(),
        config.sessions.max_history,
    );

    let answer = router.handle(message, &mut session).await.map_err(|e| {
        if e.is_upstream() {
            anyhow::anyhow!("AI service error: {e}")
        } else {
            e.into()
        }
    })?;

    println!("{answer}");
    Ok(())
}
