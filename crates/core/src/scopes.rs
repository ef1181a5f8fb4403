//! Scope-key validation and list-endpoint clamping helpers.

// ---------------------------------------------------------------------------
// Scope keys
// ---------------------------------------------------------------------------

/// Maximum length of a scope key.
pub const MAX_SCOPE_KEY_LENGTH: usize = 128;

/// Validate a scope key: non-empty, length-bounded, lowercase segments of
/// `[a-z0-9_]` separated by dots (e.g. `spell.check`, `ledger.read`).
pub fn validate_scope_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("scope key must not be empty".to_string());
    }
    if key.len() > MAX_SCOPE_KEY_LENGTH {
        return Err(format!(
            "scope key must be at most {MAX_SCOPE_KEY_LENGTH} characters"
        ));
    }
    let valid = key.split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    });
    if !valid {
        return Err(format!(
            "scope key '{key}' must be dot-separated lowercase segments of [a-z0-9_]"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Audit list clamping
// ---------------------------------------------------------------------------

/// Default number of audit entries returned by the list endpoint.
pub const DEFAULT_AUDIT_LIMIT: i64 = 100;

/// Maximum number of audit entries returned by the list endpoint.
pub const MAX_AUDIT_LIMIT: i64 = 500;

/// Clamp an optional caller-supplied limit to `[1, max]`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}
