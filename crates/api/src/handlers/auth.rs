//! Handlers for the `/auth` resource (register, login, refresh, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use smartqueue_core::error::CoreError;
use smartqueue_core::types::DbId;
use smartqueue_db::models::session::CreateSession;
use smartqueue_db::models::user::{CreateUser, UpdatePreferences, User};
use smartqueue_db::repositories::{AdminRepo, SessionRepo, UserRepo};
use smartqueue_events::{names, QueueEvent};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub display_name: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `PUT /auth/me/preferences`.
#[derive(Debug, Deserialize)]
pub struct PreferencesRequest {
    pub notifications_enabled: Option<bool>,
    pub share_presence: Option<bool>,
}

/// Successful authentication response returned by register, login, and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Public user profile. Never exposes the password hash.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub total_time_saved_mins: i32,
    pub total_queues_joined: i32,
    pub current_location_id: Option<String>,
    pub current_location_name: Option<String>,
    pub notifications_enabled: bool,
    pub share_presence: bool,
    pub is_admin: bool,
}

impl UserProfile {
    fn from_user(user: User, is_admin: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            total_time_saved_mins: user.total_time_saved_mins,
            total_queues_joined: user.total_queues_joined,
            current_location_id: user.current_location_id,
            current_location_name: user.current_location_name,
            notifications_enabled: user.notifications_enabled,
            share_presence: user.share_presence,
            is_admin,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a new account. Returns access and refresh tokens immediately so
/// the client does not need a follow-up login.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            display_name: input.display_name,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");

    let response = create_auth_response(&state, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let response = create_auth_response(&state, user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
/// The old session is revoked (token rotation).
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let response = create_auth_response(&state, user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// The authenticated user's profile, including live counters and the
/// current-location pointer.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let is_admin = AdminRepo::is_admin(&state.pool, user.id).await?;
    Ok(Json(DataResponse {
        data: UserProfile::from_user(user, is_admin),
    }))
}

/// PUT /api/v1/auth/me/preferences
///
/// Update notification/privacy flags. Omitted fields keep their value.
pub async fn update_preferences(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<PreferencesRequest>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = UserRepo::update_preferences(
        &state.pool,
        auth_user.user_id,
        &UpdatePreferences {
            notifications_enabled: input.notifications_enabled,
            share_presence: input.share_presence,
        },
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    state.event_bus.publish(
        QueueEvent::new(names::PROFILE_UPDATED).with_actor(auth_user.user_id),
    );

    let is_admin = AdminRepo::is_admin(&state.pool, user.id).await?;
    Ok(Json(DataResponse {
        data: UserProfile::from_user(user, is_admin),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn create_auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;
    let is_admin = AdminRepo::is_admin(&state.pool, user.id).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        user: UserProfile::from_user(user, is_admin),
    })
}
