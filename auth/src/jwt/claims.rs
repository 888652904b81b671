use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claim set embedded in a signed bearer token.
///
/// Claims are derived from an authenticated identity at issuance time and
/// are never persisted; the validity window is `iat..=exp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity identifier)
    pub sub: String,

    /// Username at issuance time
    pub username: String,

    /// Email at issuance time
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims for an authenticated identity with a fixed TTL.
    ///
    /// # Arguments
    /// * `subject` - Identity identifier
    /// * `username` - Username to embed
    /// * `email` - Email to embed
    /// * `ttl_hours` - Hours until the token expires
    pub fn for_identity(
        subject: impl ToString,
        username: impl ToString,
        email: impl ToString,
        ttl_hours: i64,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(ttl_hours);

        Self {
            sub: subject.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check whether the claims are expired at the given timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_identity() {
        let claims = Claims::for_identity("user123", "alice", "alice@example.com", 24);

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_is_expired() {
        let mut claims = Claims::for_identity("user123", "alice", "alice@example.com", 1);
        claims.iat = 1000;
        claims.exp = 2000;

        assert!(!claims.is_expired(1999));
        assert!(!claims.is_expired(2000));
        assert!(claims.is_expired(2001));
    }
}
