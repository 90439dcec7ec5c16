// Credential store for member records

use axum::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::member::{
    error::{MemberError, MemberResult},
    models::{Member, NewMember},
};

/// Persistence operations the member flow depends on
///
/// `save` is the authority on username uniqueness: implementations must
/// reject a duplicate atomically with `MemberError::AlreadyExists`, whatever
/// `exists_by_username` reported earlier.
#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn exists_by_username(&self, username: &str) -> MemberResult<bool>;

    async fn find_by_username(&self, username: &str) -> MemberResult<Option<Member>>;

    async fn save(&self, member: NewMember) -> MemberResult<Member>;
}

/// PostgreSQL-backed member store
#[derive(Clone)]
pub struct PgMemberStore {
    pool: PgPool,
}

impl PgMemberStore {
    /// Create a new PgMemberStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStore for PgMemberStore {
    async fn exists_by_username(&self, username: &str) -> MemberResult<bool> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM members WHERE username = $1)"
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    async fn find_by_username(&self, username: &str) -> MemberResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, username, password_hash, roles, email, nickname, created_at
            FROM members
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    async fn save(&self, member: NewMember) -> MemberResult<Member> {
        sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (username, password_hash, roles, email, nickname)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, password_hash, roles, email, nickname, created_at
            "#,
        )
        .bind(&member.username)
        .bind(&member.password_hash)
        .bind(&member.roles)
        .bind(&member.email)
        .bind(&member.nickname)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // The unique constraint on username settles concurrent registrations
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return MemberError::AlreadyExists(member.username.clone());
                }
            }
            MemberError::Database(e)
        })
    }
}

/// In-process member store for tests and local runs without a database
#[derive(Default)]
pub struct InMemoryMemberStore {
    inner: RwLock<InMemoryState>,
}

#[derive(Default)]
struct InMemoryState {
    next_id: i32,
    members: HashMap<String, Member>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.inner.read().await.members.len()
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn exists_by_username(&self, username: &str) -> MemberResult<bool> {
        Ok(self.inner.read().await.members.contains_key(username))
    }

    async fn find_by_username(&self, username: &str) -> MemberResult<Option<Member>> {
        Ok(self.inner.read().await.members.get(username).cloned())
    }

    async fn save(&self, member: NewMember) -> MemberResult<Member> {
        let mut state = self.inner.write().await;

        if state.members.contains_key(&member.username) {
            return Err(MemberError::AlreadyExists(member.username));
        }

        state.next_id += 1;
        let stored = Member {
            id: state.next_id,
            username: member.username,
            password_hash: member.password_hash,
            roles: member.roles,
            email: member.email,
            nickname: member.nickname,
            created_at: Utc::now(),
        };
        state.members.insert(stored.username.clone(), stored.clone());

        Ok(stored)
    }
}
