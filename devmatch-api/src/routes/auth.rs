/// Authentication endpoints
///
/// Companies and users authenticate through the same endpoints; the request
/// names which kind of account is logging in and the issued tokens carry
/// that account type.
///
/// # Endpoints
///
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use devmatch_shared::{
    auth::{
        jwt::{self, AccountType, TokenType},
        password,
    },
    models::{company::Company, user::User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login username
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    pub password: String,

    /// Which kind of account is logging in
    pub account_type: AccountType,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Account ID
    pub account_id: String,

    /// Account type echoed back
    pub account_type: AccountType,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Login endpoint
///
/// Authenticates a company or user account and returns JWT tokens.
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown username or wrong password (indistinguishable
///   on purpose)
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    // Resolve the stored hash for either account kind
    let (account_id, password_hash) = match req.account_type {
        AccountType::Company => {
            let company = Company::find_by_username(&state.db, &req.username)
                .await?
                .ok_or_else(invalid_credentials)?;
            (company.id, company.password_hash)
        }
        AccountType::User => {
            let user = User::find_by_username(&state.db, &req.username)
                .await?
                .ok_or_else(invalid_credentials)?;
            (user.id, user.password_hash)
        }
    };

    let valid = password::verify_password(&req.password, &password_hash)?;
    if !valid {
        return Err(invalid_credentials());
    }

    let access_claims = jwt::Claims::new(account_id, req.account_type, TokenType::Access);
    let refresh_claims = jwt::Claims::new(account_id, req.account_type, TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        account_id: account_id.to_string(),
        account_type: req.account_type,
        access_token,
        refresh_token,
    }))
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid username or password".to_string())
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
