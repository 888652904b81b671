use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type. Uses HS256 (HMAC with SHA-256); the key
/// is loaded once at construction and is read-only afterwards, so a handler
/// is safe to share across arbitrarily many concurrent requests.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Load secrets from configuration or a vault, never hardcode them
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a signed token.
    ///
    /// # Arguments
    /// * `claims` - Claims to encode (must implement Serialize)
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token.
    ///
    /// Validates the signature and the `exp` claim. Any failure is a total
    /// rejection; no claims are returned from an untrusted token.
    ///
    /// # Arguments
    /// * `token` - Token string to decode
    ///
    /// # Errors
    /// * `Expired` - The token's validity window has elapsed
    /// * `InvalidSignature` - The signature does not match
    /// * `Malformed` - The token structure cannot be parsed
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let validation = Validation::new(self.algorithm);

        let token_data =
            decode::<T>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Malformed(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::jwt::Claims;

    fn handler() -> JwtHandler {
        JwtHandler::new(b"my_secret_key_at_least_32_bytes_long!")
    }

    #[test]
    fn test_encode_and_decode() {
        let handler = handler();
        let claims = Claims::for_identity("user123", "alice", "alice@example.com", 24);

        let token = handler.encode(&claims).expect("Failed to encode token");
        assert!(!token.is_empty());

        let decoded: Claims = handler.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_decode_is_idempotent() {
        let handler = handler();
        let claims = Claims::for_identity("user123", "alice", "alice@example.com", 24);
        let token = handler.encode(&claims).expect("Failed to encode token");

        let first: Claims = handler.decode(&token).expect("Failed to decode token");
        let second: Claims = handler.decode(&token).expect("Failed to decode token");
        assert_eq!(first, second);
    }

    #[test]
    fn test_decode_malformed_token() {
        let handler = handler();

        let result = handler.decode::<Claims>("not.a.token");
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!");
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!");

        let claims = Claims::for_identity("user123", "alice", "alice@example.com", 24);
        let token = handler1.encode(&claims).expect("Failed to encode token");

        let result = handler2.decode::<Claims>(&token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_decode_expired_token() {
        let handler = handler();

        // Expired well beyond the default validation leeway
        let mut claims = Claims::for_identity("user123", "alice", "alice@example.com", 1);
        claims.iat = Utc::now().timestamp() - 7200;
        claims.exp = Utc::now().timestamp() - 3600;

        let token = handler.encode(&claims).expect("Failed to encode token");
        let result = handler.decode::<Claims>(&token);
        assert!(matches!(result, Err(JwtError::Expired)));
    }
}
