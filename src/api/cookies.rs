// src/api/cookies.rs — `sid` session cookie

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

pub const SESSION_COOKIE: &str = "sid";

/// The client's session id, or a fresh random one.
///
/// The flag is `true` when the id was minted for this request and the
/// response should set the cookie.
pub fn session_id(headers: &HeaderMap) -> (String, bool) {
    match read_cookie(headers, SESSION_COOKIE) {
        Some(sid) => (sid, false),
        None => (uuid::Uuid::new_v4().to_string(), true),
    }
}

/// Find cookie `name` across all `Cookie` headers. Empty values count as absent.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, v)| *k == name && !v.is_empty())
        .map(|(_, v)| v.to_string())
}

/// `Set-Cookie` value for the session id: http-only, same-site lax.
pub fn session_cookie(sid: &str) -> String {
    format!("{SESSION_COOKIE}={sid}; HttpOnly; SameSite=Lax; Path=/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(COOKIE, cookie.parse().unwrap());
        h
    }

    #[test]
    fn test_read_cookie_among_others() {
        let h = headers("theme=dark; sid=abc-123; lang=en");
        assert_eq!(read_cookie(&h, "sid"), Some("abc-123".into()));
        assert_eq!(read_cookie(&h, "missing"), None);
    }

    #[test]
    fn test_read_cookie_does_not_match_prefix() {
        let h = headers("xsid=nope");
        assert_eq!(read_cookie(&h, "sid"), None);
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        let (sid, fresh) = session_id(&headers("sid="));
        assert!(fresh);
        assert_eq!(sid.len(), 36);
    }

    #[test]
    fn test_session_id_reuses_cookie() {
        let (sid, fresh) = session_id(&headers("sid=known"));
        assert_eq!(sid, "known");
        assert!(!fresh);
    }

    #[test]
    fn test_fresh_ids_differ() {
        let (a, _) = session_id(&HeaderMap::new());
        let (b, _) = session_id(&HeaderMap::new());
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let c = session_cookie("abc");
        assert!(c.starts_with("sid=abc;"));
        assert!(c.contains("HttpOnly"));
        assert!(c.contains("SameSite=Lax"));
    }
}
