use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Cookie consulted when no `Authorization` header is present.
const SESSION_COOKIE: &str = "session";

/// Authenticated identity extracted from the `Authorization: Bearer <token>`
/// header, with the `session` cookie as fallback for browser traffic.
///
/// Add this as a handler parameter to require authentication. Verification
/// is purely cryptographic; no database is touched here. Handlers resolve
/// the local account row themselves, after abuse protection has run.
pub struct AuthUser {
    /// Identity-provider subject id.
    pub subject: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let bearer = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .map(|header| header.strip_prefix("Bearer ").ok_or(AppError::TokenInvalid));

        let token = match bearer {
            // A present but malformed Authorization header is an error, not
            // a reason to fall back to the cookie.
            Some(header) => header?.to_owned(),
            None => CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_owned())
                .ok_or(AppError::TokenMissing)?,
        };

        let claims = jwt::verify(&token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser {
            subject: claims.sub,
        })
    }
}
