// src/core/router.rs — Routes one chat message: platform capture, keyword rules, model fallback

use std::sync::Arc;

use super::rules::{self, SHORT_PLATFORM_REPLY_CHARS};
use super::session::Session;
use super::system_prompt;
use crate::infra::errors::ParableError;
use crate::provider::{ChatRequest, ModelProvider};

pub struct MessageRouter {
    provider: Arc<dyn ModelProvider>,
    model: String,
    max_history: usize,
}

impl MessageRouter {
    pub fn new(provider: Arc<dyn ModelProvider>, model: impl Into<String>, max_history: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            max_history,
        }
    }

    /// Answer `message` (already trimmed, non-empty) for `session`.
    ///
    /// May update the session's platform and, on a successful model call,
    /// its history. A failed model call leaves the history untouched.
    pub async fn handle(&self, message: &str, session: &mut Session) -> Result<String, ParableError> {
        session.touch();
        let m = message.to_lowercase();
        let short = m.chars().count() <= SHORT_PLATFORM_REPLY_CHARS;

        // A long message naming both platforms ends on the last one.
        for platform in rules::detect_platform(&m) {
            session.set_platform(platform);
            if short {
                return Ok(rules::acknowledge(platform));
            }
        }

        let platform = session.platform();
        if let Some(reply) = rules::match_rule(&m, platform) {
            tracing::debug!(rule = reply.kind.as_str(), "keyword rule matched");
            return Ok(reply.text);
        }

        self.fallback(message, session).await
    }

    async fn fallback(&self, message: &str, session: &mut Session) -> Result<String, ParableError> {
        let messages = system_prompt::build_conversation(
            session.platform(),
            session.history(),
            message,
            self.max_history,
        );

        tracing::info!(
            provider = self.provider.id(),
            model = %self.model,
            history = session.history().len(),
            "no rule matched, asking model"
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
        };

        let response = self.provider.chat(request).await.map_err(|e| {
            tracing::warn!(provider = self.provider.id(), error = %e, "model call failed");
            e
        })?;

        tracing::debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "model answered"
        );

        session.record_exchange(message, &response.content, self.max_history);
        Ok(response.content)
    }
}
