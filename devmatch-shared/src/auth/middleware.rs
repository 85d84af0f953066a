/// Authentication context for Axum handlers
///
/// The API server's JWT middleware validates the Bearer token and inserts an
/// [`AuthContext`] into the request extensions; protected handlers extract
/// it with Axum's `Extension` extractor.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use devmatch_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Account: {} ({})", auth.account_id, auth.account_type.as_str())
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::AccountType;

/// Authentication context added to request extensions after a successful
/// token validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated account ID
    pub account_id: Uuid,

    /// Whether the account is a company or a user
    pub account_type: AccountType,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_jwt(account_id: Uuid, account_type: AccountType) -> Self {
        Self {
            account_id,
            account_type,
        }
    }

    /// Whether the principal is a company account
    pub fn is_company(&self) -> bool {
        self.account_type == AccountType::Company
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),

    /// The authenticated principal has the wrong account type for the route
    WrongAccountType {
        expected: AccountType,
        actual: AccountType,
    },
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::WrongAccountType { expected, .. } => (
                StatusCode::FORBIDDEN,
                format!("This endpoint requires a {} account", expected.as_str()),
            ),
        };

        let body = Json(serde_json::json!({
            "error": "authentication_failed",
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_from_jwt() {
        let id = Uuid::new_v4();
        let ctx = AuthContext::from_jwt(id, AccountType::Company);

        assert_eq!(ctx.account_id, id);
        assert!(ctx.is_company());
    }

    #[test]
    fn test_user_context_is_not_company() {
        let ctx = AuthContext::from_jwt(Uuid::new_v4(), AccountType::User);
        assert!(!ctx.is_company());
    }
}
