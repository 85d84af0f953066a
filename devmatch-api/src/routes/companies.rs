/// Company endpoints: registration, lookup, profile, and partial updates
///
/// # Endpoints
///
/// - `POST  /v1/companies` - Register a company account
/// - `GET   /v1/companies/me` - Authenticated company lookup
/// - `PATCH /v1/companies/:id` - Partial update of an account
/// - `POST  /v1/companies/information` - Create the company profile
/// - `GET   /v1/companies/information/:company_id` - Fetch a profile
/// - `PATCH /v1/companies/information/:company_id` - Partial update of a profile
///
/// The PATCH endpoints take a free-form `{field name → value}` JSON object
/// and run it through the partial-update applier: only declared fields are
/// accepted, unknown names are rejected before anything is written, and no
/// business-rule validation is re-run on the patched values.

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
    models::{
        company::{Company, CreateCompany},
        company_info::{CompanyInfo, CreateCompanyInfo},
    },
    patch::{apply_patch, PatchDocument},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Company registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterCompanyRequest {
    /// Login username
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,

    /// Password (validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Contact email
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Registered company name
    #[validate(length(min = 1, max = 255, message = "Company name is required"))]
    pub name: String,

    /// Optional contact phone number
    pub phone: Option<String>,
}

/// Company profile creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyInfoRequest {
    /// Company the profile belongs to
    pub company_id: Uuid,

    /// CEO name
    #[validate(length(min = 1, max = 255, message = "CEO name is required"))]
    pub ceo: String,

    /// Registered business address
    #[validate(length(min = 1, max = 512, message = "Address is required"))]
    pub address: String,

    /// Optional switchboard number
    pub company_call: Option<String>,

    /// Optional business registration number
    pub registration_number: Option<String>,

    /// Optional URL of the uploaded registration document
    pub registration_file: Option<String>,
}

/// Register a new company account
///
/// Username, email, and company name must all be unused; each duplicate is
/// rejected with a 409 before the insert is attempted, and the database's
/// unique indexes back the check up.
///
/// # Errors
///
/// - `409 Conflict`: Username, email, or name already taken
/// - `422 Unprocessable Entity`: Validation or password strength failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterCompanyRequest>,
) -> ApiResult<Json<Company>> {
    req.validate()?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    if Company::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }

    if Company::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    if Company::find_by_name(&state.db, &req.name).await?.is_some() {
        return Err(ApiError::Conflict("Company name already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let company = Company::create(
        &state.db,
        CreateCompany {
            username: req.username,
            password_hash,
            email: req.email,
            name: req.name,
            phone: req.phone,
        },
    )
    .await?;

    Ok(Json(company))
}

/// Authenticated company lookup
///
/// Resolves the company behind the access token.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Company>> {
    require_company(&auth)?;

    let company = Company::find_by_id(&state.db, auth.account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

    Ok(Json(company))
}

/// Partial update of a company account
///
/// # Endpoint
///
/// ```text
/// PATCH /v1/companies/:id
/// Content-Type: application/json
///
/// { "email": "jobs@acme.example", "phone": null }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: A patch key is not a declared field
/// - `404 Not Found`: No company with that id
/// - `409 Conflict`: A patched value collides with a unique index
/// - `422 Unprocessable Entity`: A value cannot be coerced to its field type
pub async fn update_company(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(company_id): Path<Uuid>,
    Json(patch): Json<PatchDocument>,
) -> ApiResult<Json<Company>> {
    require_company(&auth)?;

    let company: Company = apply_patch(&state.db, company_id, &patch).await?;

    Ok(Json(company))
}

/// Create the company profile
///
/// # Errors
///
/// - `404 Not Found`: The company does not exist
/// - `409 Conflict`: The company already has a profile
pub async fn create_company_info(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCompanyInfoRequest>,
) -> ApiResult<Json<CompanyInfo>> {
    require_company(&auth)?;
    req.validate()?;

    Company::find_by_id(&state.db, req.company_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

    let info = CompanyInfo::create(
        &state.db,
        CreateCompanyInfo {
            company_id: req.company_id,
            ceo: req.ceo,
            address: req.address,
            company_call: req.company_call,
            registration_number: req.registration_number,
            registration_file: req.registration_file,
        },
    )
    .await?;

    Ok(Json(info))
}

/// Fetch a company's profile
pub async fn get_company_info(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> ApiResult<Json<CompanyInfo>> {
    let info = CompanyInfo::find_by_company_id(&state.db, company_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company profile not found".to_string()))?;

    Ok(Json(info))
}

/// Partial update of a company's profile
///
/// The path names the owning company; the profile row is resolved from it
/// and then patched field by field.
///
/// # Errors
///
/// Same taxonomy as [`update_company`].
pub async fn update_company_info(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(company_id): Path<Uuid>,
    Json(patch): Json<PatchDocument>,
) -> ApiResult<Json<CompanyInfo>> {
    require_company(&auth)?;

    let info = CompanyInfo::find_by_company_id(&state.db, company_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company profile not found".to_string()))?;

    let info: CompanyInfo = apply_patch(&state.db, info.id, &patch).await?;

    Ok(Json(info))
}

fn require_company(auth: &AuthContext) -> Result<(), ApiError> {
    if !auth.is_company() {
        return Err(ApiError::Forbidden(
            "This endpoint requires a company account".to_string(),
        ));
    }
    Ok(())
}
