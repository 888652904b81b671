use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password hashing and token handling.
///
/// Constructed once at startup from configuration (signing secret and hash
/// cost) and shared read-only across requests; both members are pure given
/// their inputs, so no synchronization is needed.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `hash_cost` - bcrypt cost factor (raised to the floor if below it)
    pub fn new(jwt_secret: &[u8], hash_cost: u32) -> Self {
        Self {
            password_hasher: PasswordHasher::with_cost(hash_cost),
            jwt_handler: JwtHandler::new(jwt_secret),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a plaintext password against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; an error means the stored digest is
    /// corrupt, not that the password is wrong.
    ///
    /// # Errors
    /// * `PasswordError` - Stored digest is structurally invalid
    pub fn verify_password(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, digest)
    }

    /// Sign claims into a bearer token.
    ///
    /// # Errors
    /// * `JwtError` - Token encoding failed
    pub fn issue_token(&self, claims: &Claims) -> Result<String, JwtError> {
        self.jwt_handler.encode(claims)
    }

    /// Validate a bearer token and recover its claims.
    ///
    /// # Errors
    /// * `JwtError` - Token is expired, forged, or malformed
    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(b"test_secret_key_at_least_32_bytes!", 12)
    }

    #[test]
    fn test_hash_verify_and_token_round_trip() {
        let auth = authenticator();

        let password = "Str0ng!Pass";
        let digest = auth.hash_password(password).expect("Failed to hash");

        assert!(auth
            .verify_password(password, &digest)
            .expect("Failed to verify"));
        assert!(!auth
            .verify_password("wrong_password", &digest)
            .expect("Failed to verify"));

        let claims = Claims::for_identity("user123", "alice", "alice@example.com", 24);
        let token = auth.issue_token(&claims).expect("Failed to issue token");

        let decoded = auth.verify_token(&token).expect("Failed to verify token");
        assert_eq!(decoded.sub, "user123");
        assert_eq!(decoded.username, "alice");
        assert_eq!(decoded.email, "alice@example.com");
    }

    #[test]
    fn test_verify_rejects_garbage_token() {
        let auth = authenticator();
        assert!(auth.verify_token("invalid.token.here").is_err());
    }
}
