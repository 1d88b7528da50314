//! Authentication routes

use axum::{extract::{Extension, State}, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use parley_shared::{ParleyError, User};

use crate::{
    auth::{hash_password, validate_password_strength, verify_password, AuthUser},
    error::{ApiError, ApiResult},
    state::AppState,
};

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub profile_pic: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    if !state.config.enable_signup {
        return Err(ApiError::BadRequest(
            "Registration is currently disabled".to_string(),
        ));
    }

    if req.full_name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("All fields are required".to_string()));
    }

    if req.full_name.trim().chars().count() > 100 {
        return Err(ApiError::Validation(
            "Full name must be at most 100 characters".to_string(),
        ));
    }

    if !is_valid_email(&req.email) {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    validate_password_strength(&req.password).map_err(|e| ApiError::Validation(e.to_string()))?;

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "signup: Password hashing failed");
        ApiError::Internal
    })?;

    let user = state
        .users
        .create(&req.email, &req.full_name, password_hash)
        .await
        .map_err(|e| match e {
            ParleyError::Conflict(_) => ApiError::EmailAlreadyExists,
            other => other.into(),
        })?;

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user,
            token,
            expires_in: state.jwt.expiry_seconds(),
        }),
    ))
}

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let record = state
        .users
        .find_by_email(&req.email)
        .await
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = verify_password(&req.password, &record.password_hash).map_err(|e| {
        tracing::error!(user_id = %record.id, error = %e, "login: Stored hash unreadable");
        ApiError::Internal
    })?;

    if !valid {
        tracing::info!(user_id = %record.id, "login: Wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let user = User::from(&record);
    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user,
        token,
        expires_in: state.jwt.expiry_seconds(),
    }))
}

/// Logout
/// Note: With stateless JWT, tokens remain valid until expiry;
/// the client discards its token
pub async fn logout(Extension(auth_user): Extension<AuthUser>) -> Json<MessageResponse> {
    tracing::info!(user_id = %auth_user.user_id, "User logged out");

    Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}

/// Upload a new profile picture
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    if req.profile_pic.trim().is_empty() {
        return Err(ApiError::Validation("Profile pic is required".to_string()));
    }

    let url = state.images.upload(&req.profile_pic).await?;
    let user = state.users.set_profile_pic(auth_user.user_id, url).await?;

    tracing::info!(user_id = %user.id, "Profile picture updated");

    Ok(Json(user))
}

/// Get the authenticated user
pub async fn check(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<User>> {
    let user = state
        .users
        .find_by_id(auth_user.user_id)
        .await
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(user))
}

// =============================================================================
// Helpers
// =============================================================================

fn issue_token(state: &AppState, user: &User) -> ApiResult<String> {
    state.jwt.generate_token(user.id, &user.email).map_err(|e| {
        tracing::error!(user_id = %user.id, error = %e, "Token generation failed");
        ApiError::Internal
    })
}

/// Basic structural email check: one @, non-empty local part, dotted domain
fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email(" ada@mail.example.org "));
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada@.com"));
        assert!(!is_valid_email("a da@example.com"));
    }
}
