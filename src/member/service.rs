// Member service - business logic layer

use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::member::{
    error::{MemberError, MemberResult},
    models::{Member, NewMember, Role, SignInRequest, SignUpRequest},
    password::PasswordService,
    repository::MemberStore,
};

/// Member service coordinating registration, authentication and logout
#[derive(Clone)]
pub struct MemberService {
    store: Arc<dyn MemberStore>,
}

impl MemberService {
    /// Create a new MemberService
    pub fn new(store: Arc<dyn MemberStore>) -> Self {
        Self { store }
    }

    /// Register a new member
    ///
    /// This method:
    /// 1. Validates the request
    /// 2. Rejects a username that is already taken
    /// 3. Hashes the password and assigns the default role
    /// 4. Persists the record
    ///
    /// The existence check is advisory; a concurrent registration that slips
    /// past it is rejected by the store on insert.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: SignUpRequest) -> MemberResult<Member> {
        info!("Registration started");

        request.validate()?;

        if self.store.exists_by_username(&request.username).await? {
            return Err(MemberError::AlreadyExists(request.username));
        }

        let password_hash = PasswordService::hash_password(&request.password)?;
        let new_member = NewMember::builder(request.username, password_hash)
            .role(Role::DEFAULT)
            .email(request.email)
            .nickname(request.nickname)
            .build();

        let member = self.store.save(new_member).await?;

        info!(member_id = member.id, "Registration completed");
        Ok(member)
    }

    /// Authenticate a member by username and password
    ///
    /// Returns the stored member; minting a token is up to the caller.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn authenticate(&self, request: SignInRequest) -> MemberResult<Member> {
        let member = self
            .store
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| MemberError::NotFound(request.username.clone()))?;

        if !PasswordService::verify_password(&request.password, &member.password_hash)? {
            return Err(MemberError::InvalidCredentials);
        }

        debug!(member_id = member.id, "Authentication succeeded");
        Ok(member)
    }

    /// Log out. Tokens are not tracked server-side, so there is nothing to undo.
    pub fn logout(&self) -> bool {
        true
    }

    /// Load a member by username
    #[instrument(skip(self))]
    pub async fn load_by_username(&self, username: &str) -> MemberResult<Member> {
        self.store
            .find_by_username(username)
            .await?
            .ok_or_else(|| MemberError::NotFound(username.to_string()))
    }
}
