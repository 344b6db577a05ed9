use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;
use crate::utils::error::AppError;

const AUTH_TOKEN_HEADER: &str = "auth-token";

/// The authenticated caller, inserted into request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
}

fn bearer_token(request: &Request) -> Option<&str> {
    let headers = request.headers();

    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    if let Some(token) = bearer {
        return Some(token.trim());
    }

    // Other Authorization schemes (e.g. Basic from a proxy) don't hide the
    // legacy header.
    headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
}

/// Rejects the request with 401 unless it carries a valid token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::AuthError("Missing authentication token".to_string()))?;

    let claims = state.jwt.verify(token)?;
    tracing::debug!(user_id = %claims.sub, "Request authenticated");

    request.extensions_mut().insert(AuthUser { id: claims.sub });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(headers: &[(&str, &str)]) -> Request {
        let mut builder = axum::http::Request::builder();
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_header_is_preferred() {
        let req = request(&[("authorization", "Bearer abc"), (AUTH_TOKEN_HEADER, "xyz")]);
        assert_eq!(bearer_token(&req), Some("abc"));
    }

    #[test]
    fn test_auth_token_header_alone() {
        let req = request(&[(AUTH_TOKEN_HEADER, " xyz ")]);
        assert_eq!(bearer_token(&req), Some("xyz"));
    }

    #[test]
    fn test_other_scheme_falls_back_to_auth_token() {
        let req = request(&[
            ("authorization", "Basic dXNlcjpwYXNz"),
            (AUTH_TOKEN_HEADER, "xyz"),
        ]);
        assert_eq!(bearer_token(&req), Some("xyz"));

        let req = request(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(bearer_token(&req), None);
    }
}
