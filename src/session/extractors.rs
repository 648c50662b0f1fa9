use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use super::{read_session, SessionId};
use crate::{error::AppError, state::AppState};

/// Session cookie that must be present and well formed.
pub struct Session(pub SessionId);

/// Session cookie if the client already has one.
pub struct MaybeSession(pub Option<SessionId>);

fn session_from_parts(parts: &Parts, state: &AppState) -> Option<SessionId> {
    let jar = CookieJar::from_headers(&parts.headers);
    read_session(&jar, &state.config.session.cookie_name)
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        session_from_parts(parts, state)
            .map(Session)
            .ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(session_from_parts(parts, state)))
    }
}
