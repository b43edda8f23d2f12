//! Helpers for sanitizing data before it enters log lines or span fields.
//!
//! Logs are safe to share for debugging — these functions ensure no
//! credential material leaks into them.

/// Strips userinfo/tokens from a URL.
///
/// - `https://token@gitlab.com/g/p` → `https://****@gitlab.com/g/p`
/// - `https://gitlab.com/g/p` → `https://gitlab.com/g/p` (no change)
pub fn redact_url(url: &str) -> String {
    if let Some(scheme_end) = url.find("://") {
        let after_scheme = &url[scheme_end + 3..];
        if let Some(at_pos) = after_scheme.find('@') {
            let scheme = &url[..scheme_end + 3];
            let after_at = &after_scheme[at_pos + 1..];
            return format!("{}****@{}", scheme, after_at);
        }
    }

    url.to_string()
}
