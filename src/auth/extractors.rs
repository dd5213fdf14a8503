use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;
use uuid::Uuid;

use super::{jwt::JwtKeys, session};
use crate::{error::ApiError, state::AppState};

/// Authenticated principal: the verified subject of the session token.
///
/// Missing, malformed, and expired tokens all produce the same rejection so
/// an external observer cannot tell them apart. The user record itself is
/// not loaded here; handlers that need user fields fetch them.
#[derive(Debug)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session::token_from_jar(&jar).ok_or(ApiError::Unauthenticated)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|e| {
            warn!(error = %e, "session token rejected");
            ApiError::Unauthenticated
        })?;

        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::{Duration as TimeDuration, OffsetDateTime};

    use crate::auth::jwt::Claims;

    async fn extract(state: &AppState, cookie: Option<&str>) -> Result<AuthUser, ApiError> {
        let mut builder = Request::builder().uri("/api/auth/me");
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn accepts_valid_session_cookie() {
        let state = AppState::fake(false);
        let user_id = Uuid::new_v4();
        let token = JwtKeys::from_ref(&state).sign(user_id).expect("sign");
        let AuthUser(sub) = extract(&state, Some(&format!("token={token}")))
            .await
            .expect("valid cookie accepted");
        assert_eq!(sub, user_id);
    }

    #[tokio::test]
    async fn missing_garbage_and_expired_reject_identically() {
        let state = AppState::fake(false);

        let missing = extract(&state, None).await.unwrap_err();
        let garbage = extract(&state, Some("token=not.a.jwt")).await.unwrap_err();

        let now = OffsetDateTime::now_utc();
        let stale = Claims {
            sub: Uuid::new_v4(),
            iat: (now - TimeDuration::days(8)).unix_timestamp() as usize,
            exp: (now - TimeDuration::days(1)).unix_timestamp() as usize,
        };
        let stale_token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        )
        .unwrap();
        let expired = extract(&state, Some(&format!("token={stale_token}")))
            .await
            .unwrap_err();

        for err in [missing, garbage, expired] {
            assert!(matches!(err, ApiError::Unauthenticated));
            assert_eq!(err.to_string(), "Not authenticated");
        }
    }

    #[tokio::test]
    async fn rejects_token_signed_with_other_secret() {
        let state = AppState::fake(false);
        let token = JwtKeys::new("some-other-secret")
            .sign(Uuid::new_v4())
            .expect("sign");
        let err = extract(&state, Some(&format!("token={token}")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }
}
