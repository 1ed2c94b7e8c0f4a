// src/core/session.rs — Per-client conversation state and the store that owns it

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::provider::Message;

/// Device family detected from message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Iphone,
    Android,
}

impl Platform {
    /// Lowercase form used in the model's system note.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Iphone => "iphone",
            Platform::Android => "android",
        }
    }

    /// Display form used in replies.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Iphone => "iPhone",
            Platform::Android => "Android",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "iphone" | "ios" => Some(Platform::Iphone),
            "android" => Some(Platform::Android),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversation state for one session id.
///
/// `platform` only moves forward: once detected it can be overwritten by
/// another detection but never cleared. `history` holds whole
/// user/assistant pairs, oldest first.
#[derive(Debug, Clone)]
pub struct Session {
    platform: Option<Platform>,
    history: Vec<Message>,
    last_seen: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            platform: None,
            history: Vec::new(),
            last_seen: Instant::now(),
        }
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    pub fn set_platform(&mut self, platform: Platform) {
        self.platform = Some(platform);
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Append one completed exchange, then drop the oldest entries so at
    /// most `cap` remain.
    pub fn record_exchange(&mut self, user: &str, assistant: &str, cap: usize) {
        self.history.push(Message::user(user));
        self.history.push(Message::assistant(assistant));
        if self.history.len() > cap {
            let excess = self.history.len() - cap;
            self.history.drain(..excess);
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }
}

pub type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

/// Process-wide map from session id to session.
///
/// Each session sits behind its own async mutex so concurrent requests for
/// the same id run one after another, including across the upstream call.
/// The outer map lock is only held for lookups and inserts.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `id`, creating an empty one on first contact.
    pub fn get_or_create(&self, id: &str) -> SessionHandle {
        let mut sessions = self.lock();
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session = %short_id(id), "new session");
                Arc::new(tokio::sync::Mutex::new(Session::new()))
            })
            .clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop sessions idle longer than `max_idle`. A session whose handle is
    /// held outside the store belongs to a request in flight and is kept,
    /// even before that request has taken the lock. Returns the number removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, handle| {
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            match handle.try_lock() {
                Ok(session) => session.idle_for() <= max_idle,
                Err(_) => true,
            }
        });
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "evicted idle sessions");
        }
        removed
    }

    /// Run `evict_idle` every `period` on the current runtime.
    pub fn spawn_sweeper(
        self: Arc<Self>,
        max_idle: Duration,
        period: Duration,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.evict_idle(max_idle);
            }
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionHandle>> {
        // Map updates are single calls; a poisoned lock still holds a valid map.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Session ids are bearer secrets; log only a prefix.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
