/// Application state and router builder
///
/// Defines the shared application state and assembles the Axum router with
/// all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use devmatch_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, patch, post},
    Router,
};
use devmatch_shared::auth::{jwt, middleware::AuthContext};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                              # Health check (public)
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /login                  # Company or user login
///     │   └── POST /refresh                # Refresh access token
///     ├── /companies/
///     │   ├── POST  /                      # Register company (public)
///     │   ├── GET   /me                    # Authenticated company
///     │   ├── PATCH /:id                   # Partial update
///     │   ├── POST  /information           # Create profile
///     │   ├── GET   /information/:company_id
///     │   └── PATCH /information/:company_id
///     ├── /users/
///     │   ├── POST  /                      # Register user (public)
///     │   ├── GET   /:username             # Lookup (public)
///     │   └── PATCH /:username             # Partial update
///     ├── /projects/
///     │   ├── GET  /search                 # Tag-filtered search (public)
///     │   ├── GET  /:id/techs              # Techs of a project (public)
///     │   ├── POST /                       # Create listing
///     │   └── POST /:id/techs              # Declare a tech
///     ├── /techs/
///     │   ├── GET  /                       # List tags (public)
///     │   └── POST /                       # Create tag
///     └── /estimates/
///         ├── GET  /:username              # Estimates for a user (public)
///         └── POST /:username              # Register estimate
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public, no auth required
    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let company_public = Router::new()
        .route("/", post(routes::companies::register))
        .route(
            "/information/:company_id",
            get(routes::companies::get_company_info),
        );

    let company_protected = Router::new()
        .route("/me", get(routes::companies::me))
        .route("/:id", patch(routes::companies::update_company))
        .route("/information", post(routes::companies::create_company_info))
        .route(
            "/information/:company_id",
            patch(routes::companies::update_company_info),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let user_public = Router::new()
        .route("/", post(routes::users::register))
        .route("/:username", get(routes::users::get_user));

    let user_protected = Router::new()
        .route("/:username", patch(routes::users::update_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let project_public = Router::new()
        .route("/search", get(routes::projects::search))
        .route("/:id/techs", get(routes::projects::project_techs));

    let project_protected = Router::new()
        .route("/", post(routes::projects::create_project))
        .route("/:id/techs", post(routes::projects::attach_tech))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let tech_public = Router::new().route("/", get(routes::techs::list_techs));

    let tech_protected = Router::new()
        .route("/", post(routes::techs::create_tech))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let estimate_public = Router::new().route("/:username", get(routes::estimates::list_estimates));

    let estimate_protected = Router::new()
        .route("/:username", post(routes::estimates::register_estimate))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/companies", company_public.merge(company_protected))
        .nest("/users", user_public.merge(user_protected))
        .nest("/projects", project_public.merge(project_protected))
        .nest("/techs", tech_public.merge(tech_protected))
        .nest("/estimates", estimate_public.merge(estimate_protected));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the Bearer token from the Authorization header,
/// then injects an [`AuthContext`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| crate::error::ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_jwt(claims.sub, claims.account_type);

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
