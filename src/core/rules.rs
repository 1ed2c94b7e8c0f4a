// src/core/rules.rs — Keyword rules answered without calling the model
//
// Every matcher takes the lowercased message. Rules are tried in the order
// of `match_rule`; the first hit wins.

use super::session::Platform;

/// Appended to platform-neutral replies while the platform is still unknown.
pub const ASK_PLATFORM: &str = "Quick question — are you on iPhone or Android?";

/// Greeting returned by `GET /api/hello`.
pub const HELLO: &str = "Hi! I’m Parable. Are you on iPhone or Android?";

/// Messages at most this many characters long that name a platform are
/// treated as a bare platform answer and acknowledged immediately.
pub const SHORT_PLATFORM_REPLY_CHARS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Zoom,
    Sound,
    Scam,
    Storage,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Zoom => "zoom",
            RuleKind::Sound => "sound",
            RuleKind::Scam => "scam",
            RuleKind::Storage => "storage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReply {
    pub kind: RuleKind,
    pub text: String,
}

/// Platforms named in the message, in the order they are checked:
/// iPhone (`iphone` or `ios`) before Android.
pub fn detect_platform(m: &str) -> Vec<Platform> {
    let mut found = Vec::with_capacity(2);
    if m.contains("iphone") || m.contains("ios") {
        found.push(Platform::Iphone);
    }
    if m.contains("android") {
        found.push(Platform::Android);
    }
    found
}

/// Reply to a short message that only names the platform.
pub fn acknowledge(platform: Platform) -> String {
    format!("Got it — {}. What issue are you having?", platform.label())
}

/// Try the canned rules in priority order: zoom, sound, scam, storage.
pub fn match_rule(m: &str, platform: Option<Platform>) -> Option<RuleReply> {
    let (kind, text) = if is_zoom(m) {
        (RuleKind::Zoom, zoom_reply(platform))
    } else if is_sound(m) {
        (RuleKind::Sound, sound_reply(platform))
    } else if is_scam(m) {
        (RuleKind::Scam, scam_reply(platform))
    } else if is_storage(m) {
        (RuleKind::Storage, STORAGE_REPLY.to_string())
    } else {
        return None;
    };
    Some(RuleReply { kind, text })
}

fn is_zoom(m: &str) -> bool {
    ["zoom", "zoomed", "magnif"].iter().any(|k| m.contains(k))
}

fn is_sound(m: &str) -> bool {
    ["no sound", "can't hear", "cannot hear", "volume", "speaker"]
        .iter()
        .any(|k| m.contains(k))
}

fn is_scam(m: &str) -> bool {
    ["scam", "pop-up", "popup", "virus"]
        .iter()
        .any(|k| m.contains(k))
}

fn is_storage(m: &str) -> bool {
    m.contains("storage")
        || m.contains("not enough space")
        || m.contains("low space")
        || (m.contains("full") && m.contains("storage"))
}

fn ask_platform(platform: Option<Platform>) -> &'static str {
    if platform.is_none() {
        ASK_PLATFORM
    } else {
        ""
    }
}

fn zoom_reply(platform: Option<Platform>) -> String {
    match platform {
        Some(Platform::Iphone) => "Try this (iPhone):\n\
             1) Double-tap with 3 fingers (often turns Zoom off).\n\
             2) Settings > Accessibility > Zoom > Off.\n\
             Did that work?"
            .to_string(),
        Some(Platform::Android) => "Try this (Android):\n\
             1) Triple-tap to turn Magnification off.\n\
             2) Settings > Accessibility > Magnification > Off.\n\
             Did that work?"
            .to_string(),
        None => format!(
            "Try this:\n\
             1) iPhone: Double-tap with 3 fingers.\n\
             2) iPhone: Settings > Accessibility > Zoom > Off.\n\
             3) Android: Settings > Accessibility > Magnification > Off.\n\
             {}",
            ask_platform(platform)
        ),
    }
}

fn sound_reply(platform: Option<Platform>) -> String {
    let text = match platform {
        Some(Platform::Iphone) => {
            "Let’s get your iPhone sound back.\n\
             1) Press Volume Up a few times.\n\
             2) Flip the Silent switch (orange showing = silent).\n\
             3) Control Center: turn Bluetooth off.\n\
             4) Settings > Sounds & Haptics: raise Ringer/Alerts.\n\
             5) Restart the iPhone.\n\
             Is it no sound at all, or just phone calls?"
        }
        Some(Platform::Android) => {
            "Let’s get your Android sound back.\n\
             1) Press Volume Up, then raise Media and Ring.\n\
             2) Turn Do Not Disturb off.\n\
             3) Turn Bluetooth off.\n\
             4) Restart the phone.\n\
             Is it no sound at all, or just phone calls?"
        }
        None => {
            "Let’s fix the sound.\n\
             1) Press Volume Up a few times.\n\
             2) Turn Bluetooth off.\n\
             3) Turn Do Not Disturb off.\n\
             4) Restart the phone.\n\
             Are you on iPhone or Android? And is it all sound, or just calls?"
        }
    };
    text.to_string()
}

fn scam_reply(platform: Option<Platform>) -> String {
    format!(
        "Don’t click anything.\n\
         1) Close the tab or app.\n\
         2) iPhone: Settings > Safari > Clear History and Website Data.\n\
         3) Android: Chrome > Settings > Privacy > Clear browsing data.\n\
         {}",
        ask_platform(platform)
    )
}

const STORAGE_REPLY: &str = "Storage full? Try this:\n\
     1) Delete big videos you don’t need.\n\
     2) Remove unused apps.\n\
     3) Delete message attachments you don’t need.\n\
     4) Empty Recently Deleted photos.\n\
     5) Turn on iCloud Photos or Google Photos.\n\
     Did that help?";
