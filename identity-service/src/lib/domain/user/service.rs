use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use chrono::Utc;

use crate::domain::user::models::AuthResponse;
use crate::domain::user::models::CredentialOutcome;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserDirectory;

/// Domain service orchestrating the credential pipeline.
///
/// Registration: directory uniqueness -> hash -> persist -> token.
/// Login: directory lookup -> verify -> token. Holds no mutable state;
/// the signing key and hash cost inside the [`Authenticator`] are fixed
/// at startup, so the service is freely shared across requests.
pub struct AuthService<D>
where
    D: UserDirectory,
{
    directory: Arc<D>,
    authenticator: Arc<Authenticator>,
    token_ttl_hours: i64,
}

impl<D> AuthService<D>
where
    D: UserDirectory,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - Identity record store implementation
    /// * `authenticator` - Startup-constructed hashing and signing handle
    /// * `token_ttl_hours` - Fixed validity window for issued tokens
    pub fn new(directory: Arc<D>, authenticator: Arc<Authenticator>, token_ttl_hours: i64) -> Self {
        Self {
            directory,
            authenticator,
            token_ttl_hours,
        }
    }

    /// Build claims for an authenticated identity, sign them, and
    /// assemble the token plus public view.
    ///
    /// Deterministic given the identity and the current time. A signing
    /// failure here is unexpected, not a handled client case.
    pub fn generate_auth_response(&self, user: PublicUser) -> Result<AuthResponse, AuthError> {
        let claims = Claims::for_identity(
            user.id,
            user.username.as_str(),
            user.email.as_str(),
            self.token_ttl_hours,
        );
        let token = self.authenticator.issue_token(&claims)?;

        Ok(AuthResponse { token, user })
    }
}

#[async_trait]
impl<D> AuthServicePort for AuthService<D>
where
    D: UserDirectory,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthResponse, AuthError> {
        let password_hash = self.authenticator.hash_password(command.password.as_str())?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            is_active: true,
            last_login: None,
            profile: command.profile,
            created_at: Utc::now(),
        };

        let created = self.directory.create(user).await.map_err(|e| match e {
            conflict @ AuthError::Conflict { .. } => conflict,
            other => {
                tracing::error!(error = %other, "User persistence failed during registration");
                AuthError::RegistrationFailed
            }
        })?;

        self.generate_auth_response(PublicUser::from(&created))
    }

    async fn authenticate(
        &self,
        identifier: &LoginIdentifier,
        password: &str,
    ) -> Result<CredentialOutcome, AuthError> {
        let user = match self.directory.find_by_identifier(identifier).await? {
            Some(user) => user,
            None => return Ok(CredentialOutcome::NotFound),
        };

        // Checked before the hash so no bcrypt time is spent on disabled
        // accounts, matching the original ordering.
        if !user.is_active {
            return Ok(CredentialOutcome::Deactivated);
        }

        if !self
            .authenticator
            .verify_password(password, &user.password_hash)?
        {
            return Ok(CredentialOutcome::Mismatch);
        }

        Ok(CredentialOutcome::Valid(PublicUser::from(&user)))
    }

    async fn login(
        &self,
        identifier: &LoginIdentifier,
        password: &str,
    ) -> Result<AuthResponse, AuthError> {
        match self.authenticate(identifier, password).await? {
            CredentialOutcome::Valid(user) => {
                if let Err(e) = self.directory.update_last_login(&user.id, Utc::now()).await {
                    tracing::warn!(user_id = %user.id, error = %e, "Failed to update last login");
                }

                self.generate_auth_response(user)
            }
            CredentialOutcome::Deactivated => Err(AuthError::AccountDeactivated),
            CredentialOutcome::NotFound | CredentialOutcome::Mismatch => {
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn profile(&self, id: &UserId) -> Result<PublicUser, AuthError> {
        self.directory
            .find_by_id(id)
            .await?
            .map(|ref user| PublicUser::from(user))
            .ok_or(AuthError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Password;
    use crate::domain::user::models::Profile;
    use crate::domain::user::models::Username;
    use crate::user::errors::ConflictField;

    mock! {
        pub TestUserDirectory {}

        #[async_trait]
        impl UserDirectory for TestUserDirectory {
            async fn create(&self, user: User) -> Result<User, AuthError>;
            async fn find_by_identifier(&self, identifier: &LoginIdentifier) -> Result<Option<User>, AuthError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;
            async fn update_last_login(&self, id: &UserId, timestamp: DateTime<Utc>) -> Result<(), AuthError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(b"test_secret_key_at_least_32_bytes!", 12))
    }

    fn service(directory: MockTestUserDirectory) -> AuthService<MockTestUserDirectory> {
        AuthService::new(Arc::new(directory), authenticator(), 24)
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand::new(
            Username::new("alice".to_string()).unwrap(),
            EmailAddress::new("a@b.com".to_string()).unwrap(),
            Password::new("Str0ng!Pass".to_string()).unwrap(),
            Profile::default(),
        )
    }

    fn stored_user(password: &str, is_active: bool) -> User {
        let hasher = Authenticator::new(b"test_secret_key_at_least_32_bytes!", 12);
        User {
            id: UserId::new(),
            username: Username::new("alice".to_string()).unwrap(),
            email: EmailAddress::new("a@b.com".to_string()).unwrap(),
            password_hash: hasher.hash_password(password).unwrap(),
            is_active,
            last_login: None,
            profile: Profile::default(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_success_issues_verifiable_token() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "alice"
                    && user.email.as_str() == "a@b.com"
                    && user.is_active
                    && user.password_hash.starts_with("$2")
            })
            .times(1)
            .returning(Ok);

        let service = service(directory);
        let response = service.register(register_command()).await.unwrap();

        assert_eq!(response.user.email.as_str(), "a@b.com");

        // The issued token decodes back to the created identity
        let claims = authenticator().verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, response.user.id.to_string());
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_register_conflict_passes_through() {
        let mut directory = MockTestUserDirectory::new();

        directory.expect_create().times(1).returning(|_| {
            Err(AuthError::Conflict {
                field: ConflictField::Email,
            })
        });

        let service = service(directory);
        let result = service.register(register_command()).await;

        assert!(matches!(
            result.unwrap_err(),
            AuthError::Conflict {
                field: ConflictField::Email
            }
        ));
    }

    #[tokio::test]
    async fn test_register_wraps_unexpected_persistence_failure() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_create()
            .times(1)
            .returning(|_| Err(AuthError::Database("connection reset".to_string())));

        let service = service(directory);
        let result = service.register(register_command()).await;

        // Internal cause is hidden behind the opaque variant
        assert!(matches!(result.unwrap_err(), AuthError::RegistrationFailed));
    }

    #[tokio::test]
    async fn test_authenticate_not_found_is_an_outcome_not_an_error() {
        let mut directory = MockTestUserDirectory::new();

        directory
            .expect_find_by_identifier()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(directory);
        let outcome = service
            .authenticate(&LoginIdentifier::parse("ghost"), "whatever1")
            .await
            .unwrap();

        assert!(matches!(outcome, CredentialOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_authenticate_deactivated_wins_over_correct_password() {
        let mut directory = MockTestUserDirectory::new();

        let user = stored_user("Str0ng!Pass", false);
        directory
            .expect_find_by_identifier()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(directory);
        let outcome = service
            .authenticate(&LoginIdentifier::parse("alice"), "Str0ng!Pass")
            .await
            .unwrap();

        assert!(matches!(outcome, CredentialOutcome::Deactivated));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_is_mismatch() {
        let mut directory = MockTestUserDirectory::new();

        let user = stored_user("Str0ng!Pass", true);
        directory
            .expect_find_by_identifier()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(directory);
        let outcome = service
            .authenticate(&LoginIdentifier::parse("alice"), "wrong")
            .await
            .unwrap();

        assert!(matches!(outcome, CredentialOutcome::Mismatch));
    }

    #[tokio::test]
    async fn test_authenticate_valid_by_email_and_username_agree() {
        let user = stored_user("Str0ng!Pass", true);
        let expected_id = user.id;

        let mut directory = MockTestUserDirectory::new();
        let by_email = user.clone();
        directory
            .expect_find_by_identifier()
            .with(eq(LoginIdentifier::Email("a@b.com".to_string())))
            .times(1)
            .returning(move |_| Ok(Some(by_email.clone())));
        let by_username = user.clone();
        directory
            .expect_find_by_identifier()
            .with(eq(LoginIdentifier::Username("alice".to_string())))
            .times(1)
            .returning(move |_| Ok(Some(by_username.clone())));

        let service = service(directory);

        let via_email = service
            .authenticate(&LoginIdentifier::parse("a@b.com"), "Str0ng!Pass")
            .await
            .unwrap();
        let via_username = service
            .authenticate(&LoginIdentifier::parse("alice"), "Str0ng!Pass")
            .await
            .unwrap();

        match (via_email, via_username) {
            (CredentialOutcome::Valid(a), CredentialOutcome::Valid(b)) => {
                assert_eq!(a, b);
                assert_eq!(a.id, expected_id);
            }
            other => panic!("Expected both outcomes valid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_touches_last_login_and_issues_token() {
        let user = stored_user("Str0ng!Pass", true);
        let user_id = user.id;

        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_by_identifier()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        directory
            .expect_update_last_login()
            .withf(move |id, _| *id == user_id)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = service(directory);
        let response = service
            .login(&LoginIdentifier::parse("a@b.com"), "Str0ng!Pass")
            .await
            .unwrap();

        let claims = authenticator().verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
    }

    #[tokio::test]
    async fn test_login_swallows_last_login_failure() {
        let user = stored_user("Str0ng!Pass", true);

        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_by_identifier()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        directory
            .expect_update_last_login()
            .times(1)
            .returning(|_, _| Err(AuthError::Database("write timeout".to_string())));

        let service = service(directory);
        let result = service
            .login(&LoginIdentifier::parse("alice"), "Str0ng!Pass")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_login_maps_miss_and_mismatch_to_invalid_credentials() {
        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_by_identifier()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(directory);
        let result = service
            .login(&LoginIdentifier::parse("ghost"), "whatever1")
            .await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));

        let user = stored_user("Str0ng!Pass", true);
        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_by_identifier()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = self::service(directory);
        let result = service.login(&LoginIdentifier::parse("alice"), "wrong").await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_deactivated_account() {
        let user = stored_user("Str0ng!Pass", false);

        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_by_identifier()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(directory);
        let result = service
            .login(&LoginIdentifier::parse("alice"), "Str0ng!Pass")
            .await;

        assert!(matches!(result.unwrap_err(), AuthError::AccountDeactivated));
    }

    #[tokio::test]
    async fn test_profile_found_and_not_found() {
        let user = stored_user("Str0ng!Pass", true);
        let user_id = user.id;

        let mut directory = MockTestUserDirectory::new();
        directory
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(directory);
        let public = service.profile(&user_id).await.unwrap();
        assert_eq!(public.id, user_id);

        let mut directory = MockTestUserDirectory::new();
        directory.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = self::service(directory);
        let result = service.profile(&UserId::new()).await;
        assert!(matches!(result.unwrap_err(), AuthError::NotFound(_)));
    }
}
