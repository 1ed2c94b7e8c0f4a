// src/core/mod.rs — Conversation routing: sessions, keyword rules, model fallback

pub mod router;
pub mod rules;
pub mod session;
pub mod system_prompt;

pub use router::MessageRouter;
pub use session::{Platform, Session, SessionStore};
