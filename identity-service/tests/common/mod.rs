use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::DateTime;
use chrono::Utc;
use identity_service::domain::user::models::LoginIdentifier;
use identity_service::domain::user::models::User;
use identity_service::domain::user::models::UserId;
use identity_service::domain::user::ports::UserDirectory;
use identity_service::domain::user::service::AuthService;
use identity_service::user::errors::AuthError;
use identity_service::user::errors::ConflictField;
use tokio::sync::RwLock;

pub const TEST_SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";
pub const TEST_TTL_HOURS: i64 = 24;

/// In-memory identity store honoring the directory contract: atomic
/// uniqueness on email and username, with email taking precedence when
/// both collide.
#[derive(Default)]
pub struct InMemoryDirectory {
    users: RwLock<Vec<User>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip an identity's active flag, for deactivation scenarios.
    pub async fn set_active(&self, id: &UserId, is_active: bool) {
        let mut users = self.users.write().await;
        if let Some(user) = users.iter_mut().find(|u| u.id == *id) {
            user.is_active = is_active;
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        // Single critical section: check-and-insert is atomic
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::Conflict {
                field: ConflictField::Email,
            });
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(AuthError::Conflict {
                field: ConflictField::Username,
            });
        }

        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_identifier(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;
        let found = match identifier {
            LoginIdentifier::Email(email) => {
                users.iter().find(|u| u.email.as_str() == email.as_str())
            }
            LoginIdentifier::Username(username) => {
                users.iter().find(|u| u.username.as_str() == username.as_str())
            }
        };
        Ok(found.cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn update_last_login(
        &self,
        id: &UserId,
        timestamp: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let mut users = self.users.write().await;
        if let Some(user) = users.iter_mut().find(|u| u.id == *id) {
            user.last_login = Some(timestamp);
        }
        Ok(())
    }
}

pub fn authenticator() -> Arc<Authenticator> {
    Arc::new(Authenticator::new(TEST_SECRET, 12))
}

pub fn service_with_directory() -> (AuthService<InMemoryDirectory>, Arc<InMemoryDirectory>) {
    let directory = Arc::new(InMemoryDirectory::new());
    let service = AuthService::new(Arc::clone(&directory), authenticator(), TEST_TTL_HOURS);
    (service, directory)
}
