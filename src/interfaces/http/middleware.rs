//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    InsufficientPermissions,
}

/// Authentication state carried by the middleware
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Authenticated user attached to the request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Client IP, taken from the `x-forwarded-for` header when present.
/// Attached alongside the user so the audit trail can record it.
#[derive(Clone, Debug)]
pub struct ClientIp(pub Option<String>);

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

fn client_ip(request: &Request<Body>) -> ClientIp {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());
    ClientIp(forwarded)
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);
    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(token) = extract_token(&auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => {
            if claims.is_expired() {
                return auth_error_response(AuthError::ExpiredToken);
            }
            let ip = client_ip(&request);
            request.extensions_mut().insert(ip);
            request
                .extensions_mut()
                .insert(AuthenticatedUser::from_claims(claims));
            next.run(request).await
        }
        Err(_) => auth_error_response(AuthError::InvalidToken),
    }
}

/// Admin-only guard. Must run after `auth_middleware` so the
/// `AuthenticatedUser` extension is present.
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => auth_error_response(AuthError::InsufficientPermissions),
        None => auth_error_response(AuthError::MissingToken),
    }
}

pub fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Token has expired"),
        AuthError::InsufficientPermissions => (StatusCode::FORBIDDEN, "Insufficient permissions"),
    };

    let body = Json(json!({
        "success": false,
        "error": message
    }));

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("Basic dXNlcg=="), None);
    }

    #[test]
    fn admin_check() {
        let user = AuthenticatedUser {
            user_id: "u1".to_string(),
            email: "a@b.c".to_string(),
            role: "admin".to_string(),
        };
        assert!(user.is_admin());

        let viewer = AuthenticatedUser {
            role: "viewer".to_string(),
            ..user
        };
        assert!(!viewer.is_admin());
    }

    fn test_user(role: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "u1".to_string(),
            email: "a@b.c".to_string(),
            role: role.to_string(),
        }
    }

    fn guarded_app(user: Option<AuthenticatedUser>) -> axum::Router {
        use axum::routing::post;

        let mut app = axum::Router::new()
            .route("/kiosks", post(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn(require_admin));
        if let Some(user) = user {
            app = app.layer(axum::Extension(user));
        }
        app
    }

    async fn send(app: axum::Router, req: Request<Body>) -> Response {
        use tower::Service;
        let mut svc = app.into_service();
        svc.call(req).await.unwrap()
    }

    fn post_req() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/kiosks")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn admin_passes_guard() {
        let resp = send(guarded_app(Some(test_user("admin"))), post_req()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn viewer_is_forbidden() {
        let resp = send(guarded_app(Some(test_user("viewer"))), post_req()).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn operator_is_forbidden() {
        let resp = send(guarded_app(Some(test_user("operator"))), post_req()).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unauthenticated_request_is_rejected() {
        let resp = send(guarded_app(None), post_req()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
