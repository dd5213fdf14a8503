use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use super::{
    dto::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, UserResponse},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::User,
    session,
};
use crate::{
    auth::extractors::AuthUser, dto::MessageResponse, error::ApiError, state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_me).put(update_me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    // Plausibility only: one @ with something on both sides. Dotless
    // domains are legal and accepted.
    lazy_static::lazy_static! {
        static ref EMAIL_RE: regex::Regex =
            regex::Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, jar, payload))]
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    let email = payload.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!("register with invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("Password is required".into()));
    }

    // The unique index still backstops this check under concurrent registers.
    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!("email already registered");
        return Err(ApiError::EmailTaken);
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, name, &email, &hash, payload.bio.as_deref()).await?;

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    let jar = jar.add(session::session_cookie(token, state.config.production));

    info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User registered",
            user: UserResponse::from(user),
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password must be indistinguishable to the
    // caller, so both paths end in the same variant.
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    let jar = jar.add(session::session_cookie(token, state.config.production));

    info!(user_id = %user.id, "user logged in");
    Ok((
        jar,
        Json(AuthResponse {
            message: "Login successful",
            user: UserResponse::from(user),
        }),
    ))
}

/// Idempotent: clearing an absent cookie still succeeds.
#[instrument(skip(state, jar))]
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(session::removal_cookie(state.config.production));
    (
        jar,
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    )
}

#[instrument(skip(state))]
async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    // A valid token whose user has disappeared is an orphaned session.
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(UserResponse::from(user)))
}

#[instrument(skip(state, payload))]
async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if let Some(name) = payload.name.as_deref() {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Name cannot be empty".into()));
        }
    }

    let user = User::update_profile(
        &state.db,
        user_id,
        payload.name.as_deref().map(str::trim),
        payload.bio.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(AuthResponse {
        message: "Profile updated successfully",
        user: UserResponse::from(user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a@x.io"));
        // Dotless domains are plausible and must register fine.
        assert!(is_valid_email("a@x"));
        assert!(is_valid_email("root@localhost"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("@x"));
        assert!(!is_valid_email("a@"));
        assert!(!is_valid_email(""));
    }
}
