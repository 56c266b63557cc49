//! HTTP Basic authentication for write endpoints

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::config::Settings;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Proof that the request carried the configured API credentials.
///
/// Add it as a handler argument ahead of any body extractor so the body
/// is never read for rejected requests.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated;

impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let credentials = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(decode_basic);

        match credentials {
            Some((username, password))
                if credentials_match(&state.settings, &username, &password) =>
            {
                Ok(Authenticated)
            }
            Some((username, _)) => {
                warn!("Rejected credentials for user '{}'", username);
                Err(ApiError::InvalidCredentials)
            }
            None => Err(ApiError::InvalidCredentials),
        }
    }
}

/// Split an `Authorization: Basic <base64(user:password)>` value.
fn decode_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn credentials_match(settings: &Settings, username: &str, password: &str) -> bool {
    let username_ok = username.as_bytes().ct_eq(settings.api_username.as_bytes());
    let password_ok = password.as_bytes().ct_eq(settings.api_password.as_bytes());
    (username_ok & password_ok).into()
}
