/// Estimate endpoints: companies rating users
///
/// # Endpoints
///
/// - `POST /v1/estimates/:username` - Authenticated company rates a user
/// - `GET  /v1/estimates/:username` - Estimates a user has received

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use devmatch_shared::{
    auth::middleware::AuthContext,
    models::{
        estimate::{CreateEstimate, Estimate},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Estimate registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterEstimateRequest {
    /// Score from 1 to 5
    #[validate(range(min = 1, max = 5, message = "Score must be between 1 and 5"))]
    pub score: i32,

    /// Optional free-text comment
    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    pub comment: Option<String>,
}

/// Estimates a user has received, with their average
#[derive(Debug, Serialize)]
pub struct EstimateListResponse {
    /// Individual estimates, newest first
    pub estimates: Vec<Estimate>,

    /// Average score, absent when there are no estimates
    pub average_score: Option<f64>,
}

/// Register an estimate for a user
///
/// The rating company comes from the access token; the rated user from the
/// path.
///
/// # Errors
///
/// - `403 Forbidden`: Principal is not a company account
/// - `404 Not Found`: No user with that username
/// - `422 Unprocessable Entity`: Score out of range
pub async fn register_estimate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(username): Path<String>,
    Json(req): Json<RegisterEstimateRequest>,
) -> ApiResult<Json<Estimate>> {
    if !auth.is_company() {
        return Err(ApiError::Forbidden(
            "Only company accounts can register estimates".to_string(),
        ));
    }
    req.validate()?;

    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let estimate = Estimate::create(
        &state.db,
        CreateEstimate {
            company_id: auth.account_id,
            user_id: user.id,
            score: req.score,
            comment: req.comment,
        },
    )
    .await?;

    Ok(Json(estimate))
}

/// Estimates a user has received
pub async fn list_estimates(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<EstimateListResponse>> {
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let estimates = Estimate::list_by_user(&state.db, user.id).await?;
    let average_score = Estimate::average_for_user(&state.db, user.id).await?;

    Ok(Json(EstimateListResponse {
        estimates,
        average_score,
    }))
}
