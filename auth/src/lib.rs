//! Authentication infrastructure library
//!
//! Provides the building blocks of the credential pipeline:
//! - Password hashing (bcrypt with an enforced cost floor)
//! - Signed bearer token issuance and verification (JWT, HS256)
//! - A coordinator bundling both behind a single startup-constructed handle
//!
//! The service defines its own domain traits and adapts these implementations,
//! keeping credential mechanics out of the domain layer.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest).unwrap());
//! assert!(!hasher.verify("not_my_password", &digest).unwrap());
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::for_identity("user123", "alice", "alice@example.com", 24);
//! let token = handler.encode(&claims).unwrap();
//! let decoded: Claims = handler.decode(&token).unwrap();
//! assert_eq!(decoded.sub, "user123");
//! ```
//!
//! ## Combined
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", 12);
//!
//! // Register: hash password for storage
//! let digest = auth.hash_password("Str0ng!Pass").unwrap();
//!
//! // Login: verify credentials, then issue a token
//! assert!(auth.verify_password("Str0ng!Pass", &digest).unwrap());
//! let claims = Claims::for_identity("user123", "alice", "alice@example.com", 24);
//! let token = auth.issue_token(&claims).unwrap();
//!
//! // Authenticated request: verify the token
//! let decoded = auth.verify_token(&token).unwrap();
//! assert_eq!(decoded.username, "alice");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
