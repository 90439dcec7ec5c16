// Authentication extractor for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;
use tracing::debug;

use crate::member::{error::MemberError, session::extract_token, token::TokenService};

/// Member identity taken from a valid bearer token
///
/// The token is read from the `Authorization` header, or from the
/// `X-AUTH-TOKEN` cookie when the header is absent.
#[derive(Debug, Clone)]
pub struct AuthenticatedMember {
    pub username: String,
    pub roles: Vec<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedMember
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = MemberError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?;

        let token_service = Arc::<TokenService>::from_ref(state);
        let claims = token_service.validate_token(&token)?;

        debug!("Authenticated request for member {}", claims.sub);
        Ok(AuthenticatedMember {
            username: claims.sub,
            roles: claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::token::Claims;
    use axum::http::{header, Request};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use proptest::prelude::*;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    #[derive(Clone)]
    struct TestState {
        tokens: Arc<TokenService>,
    }

    impl FromRef<TestState> for Arc<TokenService> {
        fn from_ref(state: &TestState) -> Self {
            state.tokens.clone()
        }
    }

    fn test_state() -> TestState {
        TestState {
            tokens: Arc::new(TokenService::new(SECRET)),
        }
    }

    fn parts_with(name: header::HeaderName, value: &str) -> Parts {
        let req = Request::builder()
            .uri("/")
            .header(name, value)
            .body(())
            .unwrap();
        req.into_parts().0
    }

    fn parts_without_auth() -> Parts {
        Request::builder().uri("/").body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_valid_bearer_token_is_accepted() {
        let state = test_state();
        let token = state
            .tokens
            .generate_token("alice", &["ROLE_USER".to_string()])
            .unwrap();

        let mut parts = parts_with(header::AUTHORIZATION, &format!("Bearer {}", token));
        let member = AuthenticatedMember::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert_eq!(member.username, "alice");
        assert_eq!(member.roles, vec!["ROLE_USER".to_string()]);
    }

    #[tokio::test]
    async fn test_cookie_token_is_accepted() {
        let state = test_state();
        let token = state
            .tokens
            .generate_token("alice", &["ROLE_USER".to_string()])
            .unwrap();

        let mut parts = parts_with(header::COOKIE, &format!("X-AUTH-TOKEN={}", token));
        let member = AuthenticatedMember::from_request_parts(&mut parts, &state)
            .await
            .unwrap();

        assert_eq!(member.username, "alice");
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let claims = Claims {
            sub: "alice".to_string(),
            roles: vec!["ROLE_USER".to_string()],
            iat: Utc::now().timestamp() - 1000,
            exp: Utc::now().timestamp() - 500,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let mut parts = parts_with(header::AUTHORIZATION, &format!("Bearer {}", token));
        let result = AuthenticatedMember::from_request_parts(&mut parts, &test_state()).await;

        assert!(matches!(result, Err(MemberError::ExpiredToken)));
    }

    #[tokio::test]
    async fn test_missing_token() {
        let mut parts = parts_without_auth();
        let result = AuthenticatedMember::from_request_parts(&mut parts, &test_state()).await;

        assert!(matches!(result, Err(MemberError::MissingToken)));
    }

    #[tokio::test]
    async fn test_invalid_bearer_format() {
        for auth_value in ["InvalidFormat token", "token_without_bearer", "Basic dXNlcjpwYXNz"] {
            let mut parts = parts_with(header::AUTHORIZATION, auth_value);
            let result = AuthenticatedMember::from_request_parts(&mut parts, &test_state()).await;

            assert!(matches!(result, Err(MemberError::InvalidToken)));
        }
    }

    proptest! {
        #[test]
        fn prop_malformed_tokens_rejected(
            malformed in "[a-zA-Z0-9]{10,50}"
        ) {
            let mut parts = parts_with(header::AUTHORIZATION, &format!("Bearer {}", malformed));

            let rt = tokio::runtime::Runtime::new().unwrap();
            let result = rt.block_on(
                AuthenticatedMember::from_request_parts(&mut parts, &test_state())
            );

            prop_assert!(result.is_err());
        }
    }
}
