// src/core/system_prompt.rs — Persona prompt and conversation assembly for the model fallback

use super::session::Platform;
use crate::provider::Message;

/// Persona and formatting rules sent as the first system message on every
/// fallback call.
pub const SYSTEM_PROMPT: &str = "You are Parable Smartphone Support. Talk like a calm, friendly helper.\n\
Rules:\n\
- Use simple words. No tech jargon.\n\
- Keep it short: 3–6 steps max.\n\
- One step per line. Start each line with a verb: Tap, Open, Turn on, Turn off, Go to, Try, Restart.\n\
- Ask at most ONE question, only if needed.\n\
- If you mention a setting, include the exact path like: Settings > Accessibility > Zoom.\n\
- Avoid acronyms. If you must use one, explain it in 3 words.\n\
- If scams/pop-ups: start with 'Don’t click anything.'\n\
- End with: 'Did that work?' when appropriate.\n";

/// Build the ordered message list for one fallback call.
///
/// Order:
///   1. Persona system prompt
///   2. "User is on {platform}." when the platform is known
///   3. The last `max_history` stored turns, oldest first
///   4. The new user message
pub fn build_conversation(
    platform: Option<Platform>,
    history: &[Message],
    message: &str,
    max_history: usize,
) -> Vec<Message> {
    let recent = &history[history.len().saturating_sub(max_history)..];

    let mut convo = Vec::with_capacity(recent.len() + 3);
    convo.push(Message::system(SYSTEM_PROMPT));
    if let Some(p) = platform {
        convo.push(Message::system(format!("User is on {p}.")));
    }
    convo.extend(recent.iter().cloned());
    convo.push(Message::user(message));
    convo
}
