//! Authentication routes for registration and login.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::routes::{error_json, internal_error};
use pocketplan_core::auth::{hash_password, verify_password};
use pocketplan_db::{UserRepository, repositories::UserRepoError};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Public view of a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
}

/// Response after successful authentication.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The authenticated user.
    pub user: UserResponse,
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if payload.username.trim().is_empty() {
        return error_json(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "username is required",
        );
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return error_json(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "a valid email is required",
        );
    }
    if payload.password.len() < 8 {
        return error_json(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "password must be at least 8 characters",
        );
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error();
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo
        .create(&payload.username, &payload.email, &password_hash)
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, "User registered");
            (
                StatusCode::CREATED,
                Json(UserResponse {
                    id: user.id,
                    username: user.username,
                    email: user.email,
                }),
            )
                .into_response()
        }
        Err(UserRepoError::DuplicateUsername) => error_json(
            StatusCode::CONFLICT,
            "duplicate_username",
            "Username already taken",
        ),
        Err(UserRepoError::DuplicateEmail) => error_json(
            StatusCode::CONFLICT,
            "duplicate_email",
            "Email already registered",
        ),
        Err(e) => {
            error!(error = %e, "Database error during registration");
            internal_error()
        }
    }
}

/// POST /auth/login - Authenticate and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_username(&payload.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for non-existent user");
            return error_json(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid username or password",
            );
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return error_json(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid username or password",
            );
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    let access_token = match state.jwt_service.generate_access_token(user.id, &user.username) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error();
        }
    };

    let refresh_token = match state
        .jwt_service
        .generate_refresh_token(user.id, &user.username)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate refresh token");
            return internal_error();
        }
    };

    info!(user_id = %user.id, "User logged in");

    let response = LoginResponse {
        user: UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
        },
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
