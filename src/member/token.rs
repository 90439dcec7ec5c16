// JWT token generation and validation service

use crate::member::error::MemberError;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Default token lifetime (1 hour)
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

/// Longest token lifetime accepted from configuration (365 days)
pub const MAX_TOKEN_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // username
    pub roles: Vec<String>,
    pub exp: i64,           // expiration timestamp
    pub iat: i64,           // issued at timestamp
}

/// Token service for JWT operations
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with the default lifetime
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, DEFAULT_TOKEN_TTL_SECONDS)
    }

    /// Create a new TokenService whose tokens live `ttl_seconds`
    pub fn with_ttl(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_duration: ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.token_duration
    }

    /// Generate a bearer token carrying the username and role claims
    pub fn generate_token(&self, username: &str, roles: &[String]) -> Result<String, MemberError> {
        let now = Utc::now().timestamp();
        let exp = now.checked_add(self.token_duration).ok_or_else(|| {
            MemberError::TokenGeneration(format!(
                "token lifetime of {}s overflows the expiry timestamp",
                self.token_duration
            ))
        })?;

        let claims = Claims {
            sub: username.to_string(),
            roles: roles.to_vec(),
            iat: now,
            exp,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| MemberError::TokenGeneration(e.to_string()))
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, MemberError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => MemberError::ExpiredToken,
                _ => MemberError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes")
    }

    fn user_roles() -> Vec<String> {
        vec!["ROLE_USER".to_string()]
    }

    #[test]
    fn test_default_expiration_is_one_hour() {
        let service = test_token_service();
        let token = service.generate_token("alice", &user_roles()).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_custom_ttl_is_honoured() {
        let service = TokenService::with_ttl("secret", 120);
        let token = service.generate_token("alice", &user_roles()).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(service.ttl_seconds(), 120);
        assert_eq!(claims.exp - claims.iat, 120);
    }

    #[test]
    fn test_overflowing_ttl_is_an_error() {
        let service = TokenService::with_ttl("secret", i64::MAX);
        let result = service.generate_token("alice", &user_roles());

        assert!(matches!(result, Err(MemberError::TokenGeneration(_))));
    }

    #[test]
    fn test_claims_contain_identity_and_roles() {
        let service = test_token_service();
        let roles = vec!["ROLE_USER".to_string(), "ROLE_ADMIN".to_string()];
        let token = service.generate_token("alice", &roles).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, roles);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        for token in ["", "not.a.token", "invalid_token_format", "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature"] {
            assert!(matches!(service.validate_token(token), Err(MemberError::InvalidToken)));
        }
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1");
        let service2 = TokenService::new("secret2");

        let token = service1.generate_token("alice", &user_roles()).unwrap();

        assert!(service1.validate_token(&token).is_ok());
        assert!(matches!(service2.validate_token(&token), Err(MemberError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let claims = Claims {
            sub: "alice".to_string(),
            roles: user_roles(),
            iat: Utc::now().timestamp() - 1000,
            exp: Utc::now().timestamp() - 500,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();

        let result = test_token_service().validate_token(&token);
        assert!(matches!(result, Err(MemberError::ExpiredToken)));
    }

    proptest! {
        #[test]
        fn prop_token_claims_contain_identity(
            username in "[a-z0-9_]{1,20}",
            admin in any::<bool>()
        ) {
            let service = test_token_service();
            let mut roles = user_roles();
            if admin {
                roles.push("ROLE_ADMIN".to_string());
            }

            let token = service.generate_token(&username, &roles)?;
            let claims = service.validate_token(&token)?;
            prop_assert_eq!(claims.sub, username);
            prop_assert_eq!(claims.roles, roles);
            prop_assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECONDS);
        }

        #[test]
        fn prop_malformed_tokens_rejected(
            malformed in "[a-zA-Z0-9]{10,50}"
        ) {
            let service = test_token_service();
            prop_assert!(service.validate_token(&malformed).is_err());
        }
    }
}
