// Member data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::validate_username;

/// Role granted to a member
///
/// Roles are stored and transported by name (`ROLE_USER`, `ROLE_ADMIN`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    /// Reserved for accounts provisioned outside the registration flow
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    /// Role assigned to every newly registered member
    pub const DEFAULT: Role = Role::User;

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_USER" => Ok(Role::User),
            "ROLE_ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Member database model
#[derive(Debug, Clone, FromRow)]
pub struct Member {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r == role.as_str())
    }
}

/// Member response model (excludes password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = json!(["ROLE_USER"]))]
    pub roles: Vec<String>,
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[schema(example = "Alice")]
    pub nickname: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            username: member.username,
            roles: member.roles,
            email: member.email,
            nickname: member.nickname,
            created_at: member.created_at,
        }
    }
}

/// Registration request DTO
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[validate(
        length(min = 1, max = 50, message = "Username must be between 1 and 50 characters"),
        custom = "validate_username"
    )]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 1, max = 128, message = "Password must be between 1 and 128 characters"))]
    #[schema(example = "correct horse battery staple")]
    pub password: String,
    #[validate(email(message = "Email must be a valid address"))]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[validate(length(max = 50, message = "Nickname must not exceed 50 characters"))]
    #[schema(example = "Alice")]
    pub nickname: Option<String>,
}

/// Login request DTO
///
/// Not validated: an unknown username is `NotFound` and any other mismatch,
/// empty password included, is `InvalidCredentials`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignInRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

/// A member record ready to be inserted
///
/// Built from a sign-up request once the password has been hashed. The
/// request itself is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub email: Option<String>,
    pub nickname: Option<String>,
}

impl NewMember {
    pub fn builder(username: impl Into<String>, password_hash: impl Into<String>) -> NewMemberBuilder {
        NewMemberBuilder {
            username: username.into(),
            password_hash: password_hash.into(),
            roles: Vec::new(),
            email: None,
            nickname: None,
        }
    }
}

/// Builder for [`NewMember`]
#[derive(Debug)]
pub struct NewMemberBuilder {
    username: String,
    password_hash: String,
    roles: Vec<Role>,
    email: Option<String>,
    nickname: Option<String>,
}

impl NewMemberBuilder {
    pub fn role(mut self, role: Role) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    pub fn nickname(mut self, nickname: Option<String>) -> Self {
        self.nickname = nickname;
        self
    }

    /// Finish the record. A member always holds at least the default role.
    pub fn build(self) -> NewMember {
        let roles = if self.roles.is_empty() {
            vec![Role::DEFAULT]
        } else {
            self.roles
        };

        NewMember {
            username: self.username,
            password_hash: self.password_hash,
            roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
            email: self.email,
            nickname: self.nickname,
        }
    }
}
