use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::SharedState;

/// Proof that the caller presented the service API key. Accepted either as
/// an `x-api-key` header or as a bearer token.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

impl FromRequestParts<SharedState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(value) = parts.headers.get("x-api-key") {
            let provided = value
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid API key header".to_string()))?;
            return check_key(provided, &state.config.api_key);
        }

        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return check_key(token, &state.config.api_key);
            }
        }

        Err(AppError::Unauthorized("Missing API key".to_string()))
    }
}

fn check_key(provided: &str, expected: &str) -> Result<ApiKey, AppError> {
    // Constant-time compare; ct_eq returns false for mismatched lengths.
    if bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
        Ok(ApiKey)
    } else {
        Err(AppError::Unauthorized("Invalid API key".to_string()))
    }
}
