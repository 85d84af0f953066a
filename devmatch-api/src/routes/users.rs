/// User endpoints: registration, lookup, and partial updates
///
/// # Endpoints
///
/// - `POST  /v1/users` - Register a developer account
/// - `GET   /v1/users/:username` - Lookup by username
/// - `PATCH /v1/users/:username` - Partial update of an account

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use devmatch_shared::{
    auth::{middleware::AuthContext, password},
    models::user::{CreateUser, User},
    patch::{apply_patch, PatchDocument},
};
use serde::Deserialize;
use validator::Validate;

/// User registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    /// Login username
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,

    /// Password (validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Contact email
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Optional display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    /// Optional contact phone number
    pub phone: Option<String>,
}

/// Register a new developer account
///
/// # Errors
///
/// - `409 Conflict`: Username or email already taken
/// - `422 Unprocessable Entity`: Validation or password strength failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
            email: req.email,
            name: req.name,
            phone: req.phone,
        },
    )
    .await?;

    Ok(Json(user))
}

/// Lookup a user by username
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Partial update of a user account
///
/// The account is addressed by username, as everywhere else on the user
/// surface; the patch itself is applied by id.
///
/// # Errors
///
/// - `400 Bad Request`: A patch key is not a declared field
/// - `404 Not Found`: No user with that username
/// - `409 Conflict`: A patched value collides with a unique index
/// - `422 Unprocessable Entity`: A value cannot be coerced to its field type
pub async fn update_user(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Path(username): Path<String>,
    Json(patch): Json<PatchDocument>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let user: User = apply_patch(&state.db, user.id, &patch).await?;

    Ok(Json(user))
}
