// ==================== USER STORE ====================
// Persistence seam for user accounts. MongoDB in production,
// an in-memory map for `DATABASE_URL=memory://` and tests.

use crate::{models::User, utils::AppError};
use async_trait::async_trait;
use mongodb::bson::DateTime as BsonDateTime;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    /// Inserts a new account. Fails with `AppError::Conflict` when the
    /// username is already taken.
    async fn insert(&self, user: &User) -> Result<(), AppError>;

    async fn record_login(&self, user_id: &str, at: BsonDateTime) -> Result<(), AppError>;

    async fn ping(&self) -> Result<(), AppError>;

    fn backend_name(&self) -> &'static str;
}

/// Usernames are the map keys, so uniqueness is checked and enforced
/// under the same write lock.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.username) {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn record_login(&self, user_id: &str, at: BsonDateTime) -> Result<(), AppError> {
        let mut users = self.users.write().await;

        if let Some(user) = users.values_mut().find(|u| u.user_id == user_id) {
            user.last_login = Some(at);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
