//! Bearer-credential extraction for Axum handlers.

use axum::http::HeaderMap;
use grimoire_core::error::CoreError;

use crate::error::AppError;

/// Extract the bearer credential from an `Authorization` header.
///
/// Token issuance reads a developer-key secret from it; the decision
/// endpoint reads an access token and treats any failure as a policy
/// denial rather than an HTTP error.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_credential() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(extract_bearer(&headers).unwrap(), "abc123");
    }

    #[test]
    fn rejects_missing_and_malformed_headers() {
        let headers = HeaderMap::new();
        assert_matches!(
            extract_bearer(&headers),
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc123"));
        assert_matches!(
            extract_bearer(&headers),
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
    }
}
