use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::AuthResponse;
use crate::domain::user::models::CredentialOutcome;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::models::PublicUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new identity and issue its first token.
    ///
    /// Uniqueness is delegated to the directory's atomic create; the
    /// plaintext password is hashed before anything is persisted and is
    /// never logged.
    ///
    /// # Arguments
    /// * `command` - Validated command with username, email, password, profile
    ///
    /// # Returns
    /// Signed token plus the public view of the created identity
    ///
    /// # Errors
    /// * `Conflict` - Email or username is already taken
    /// * `RegistrationFailed` - Any other persistence failure (cause hidden)
    async fn register(&self, command: RegisterCommand) -> Result<AuthResponse, AuthError>;

    /// Validate credentials against the current directory state.
    ///
    /// A pure query: no state is mutated, and every branch is an ordinary
    /// outcome rather than an error. The caller decides how each outcome
    /// is surfaced.
    ///
    /// # Arguments
    /// * `identifier` - Email or username
    /// * `password` - Plaintext password to check
    ///
    /// # Returns
    /// [`CredentialOutcome`] covering valid, mismatch, not-found, and
    /// deactivated branches
    ///
    /// # Errors
    /// * `Database` - Directory read failed
    /// * `Password` - Stored digest is corrupt
    async fn authenticate(
        &self,
        identifier: &LoginIdentifier,
        password: &str,
    ) -> Result<CredentialOutcome, AuthError>;

    /// Validate credentials, touch last-login, and issue a token.
    ///
    /// The last-login update is best-effort: a failed write is logged and
    /// swallowed, never surfaced, and never blocks token issuance.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identifier or wrong password
    ///   (deliberately undifferentiated)
    /// * `AccountDeactivated` - Identity exists but is disabled
    async fn login(
        &self,
        identifier: &LoginIdentifier,
        password: &str,
    ) -> Result<AuthResponse, AuthError>;

    /// Retrieve the public view of an identity by id.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this id
    /// * `Database` - Directory read failed
    async fn profile(&self, id: &UserId) -> Result<PublicUser, AuthError>;
}

/// Store contract for identity records.
///
/// Uniqueness of email and username is enforced here, at the store
/// boundary, not by in-process coordination: two concurrent creates for
/// the same email or username must yield exactly one success and one
/// conflict.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Persist a new identity record, atomically enforcing uniqueness.
    ///
    /// # Returns
    /// The created record
    ///
    /// # Errors
    /// * `Conflict` - Email or username already exists; when both collide,
    ///   email takes precedence in the reported field
    /// * `Database` - Store operation failed
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Look up a record by email or username in a single logical read.
    ///
    /// Email lookups are case-insensitive (the stored email is lowercase);
    /// username lookups are case-sensitive.
    ///
    /// # Returns
    /// The record, or `None` if no identity matches
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn find_by_identifier(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<User>, AuthError>;

    /// Look up a record by id.
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    /// Record the time of a successful login.
    ///
    /// Best-effort from the caller's point of view: the login flow logs
    /// and swallows any error from this write.
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn update_last_login(
        &self,
        id: &UserId,
        timestamp: DateTime<Utc>,
    ) -> Result<(), AuthError>;
}
