//! Common test utilities for API integration tests
//!
//! Provides a TestContext that connects to the test database, applies
//! migrations, provisions a company and a user fixture, and builds the full
//! router for in-process requests.
//!
//! Requires DATABASE_URL and JWT_SECRET in the environment (a `.env` file
//! works via dotenvy).

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use devmatch_api::app::{build_router, AppState};
use devmatch_api::config::Config;
use devmatch_shared::auth::jwt::{create_token, AccountType, Claims, TokenType};
use devmatch_shared::models::company::{Company, CreateCompany};
use devmatch_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub company: Company,
    pub user: User,
    pub company_token: String,
}

impl TestContext {
    /// Creates a new test context with fresh fixtures
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Migrations live in the shared crate (path relative to this crate's
        // Cargo.toml)
        sqlx::migrate!("../devmatch-shared/migrations").run(&db).await?;

        let tag = Uuid::new_v4();

        let company = Company::create(
            &db,
            CreateCompany {
                username: format!("company-{}", tag),
                password_hash: "test_hash".to_string(),
                email: format!("company-{}@example.com", tag),
                name: format!("Company {}", tag),
                phone: None,
            },
        )
        .await?;

        let user = User::create(
            &db,
            CreateUser {
                username: format!("user-{}", tag),
                password_hash: "test_hash".to_string(),
                email: format!("user-{}@example.com", tag),
                name: Some("Test User".to_string()),
                phone: None,
            },
        )
        .await?;

        let claims = Claims::new(company.id, AccountType::Company, TokenType::Access);
        let company_token = create_token(&claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            company,
            user,
            company_token,
        })
    }

    /// Returns the company's authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.company_token)
    }

    /// Cleans up test data (cascades to profiles, projects, estimates)
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(self.company.id)
            .execute(&self.db)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Builds a JSON request with optional bearer auth
pub fn json_request(
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body as JSON
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
