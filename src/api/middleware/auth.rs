//! API key authentication extractor

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::key_prefix;

/// Extractor that requires the caller to present a stored API key
///
/// The key is read from either:
/// - Authorization header: `Bearer <api_key>`
/// - X-API-Key header: `<api_key>`
#[derive(Debug, Clone)]
pub struct RequireApiKey(pub String);

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key_value =
            extract_api_key_from_headers(&parts.headers).ok_or_else(ApiError::unauthorized)?;

        debug!(key_prefix = %key_prefix(&api_key_value), "Validating API key");

        if !state.registry.has_api_key(&api_key_value).await? {
            debug!(key_prefix = %key_prefix(&api_key_value), "Unknown API key");
            return Err(ApiError::unauthorized());
        }

        Ok(RequireApiKey(api_key_value))
    }
}

fn extract_api_key_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    if let Some(token) = bearer.filter(|token| !token.is_empty()) {
        return Some(token);
    }

    headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer test-key-12345".parse().unwrap());

        assert_eq!(
            extract_api_key_from_headers(&headers).as_deref(),
            Some("test-key-12345")
        );
    }

    #[test]
    fn test_extract_x_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "test-key-67890".parse().unwrap());

        assert_eq!(
            extract_api_key_from_headers(&headers).as_deref(),
            Some("test-key-67890")
        );
    }

    #[test]
    fn test_bearer_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer bearer-key".parse().unwrap());
        headers.insert("x-api-key", "x-api-key".parse().unwrap());

        assert_eq!(
            extract_api_key_from_headers(&headers).as_deref(),
            Some("bearer-key")
        );
    }

    #[test]
    fn test_basic_auth_falls_through_to_x_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        assert!(extract_api_key_from_headers(&headers).is_none());

        headers.insert("x-api-key", "fallback".parse().unwrap());
        assert_eq!(
            extract_api_key_from_headers(&headers).as_deref(),
            Some("fallback")
        );
    }

    #[test]
    fn test_missing_or_blank_api_key() {
        let mut headers = HeaderMap::new();
        assert!(extract_api_key_from_headers(&headers).is_none());

        headers.insert(header::AUTHORIZATION, "Bearer   ".parse().unwrap());
        assert!(extract_api_key_from_headers(&headers).is_none());
    }
}
