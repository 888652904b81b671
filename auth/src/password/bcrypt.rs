use super::errors::PasswordError;

/// Password hashing implementation backed by bcrypt.
///
/// The cost factor is a security floor: it can be raised through
/// configuration but never lowered below [`PasswordHasher::MIN_COST`].
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Minimum acceptable bcrypt cost factor.
    pub const MIN_COST: u32 = 12;

    /// Create a password hasher at the minimum cost.
    pub fn new() -> Self {
        Self {
            cost: Self::MIN_COST,
        }
    }

    /// Create a password hasher with an explicit cost factor.
    ///
    /// Costs below [`PasswordHasher::MIN_COST`] are raised to the floor;
    /// the work factor is never silently weakened.
    ///
    /// # Arguments
    /// * `cost` - Requested bcrypt cost factor
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.max(Self::MIN_COST),
        }
    }

    /// Effective cost factor in use.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password for storage.
    ///
    /// Salt generation is handled by bcrypt; the returned digest embeds
    /// algorithm, cost, and salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Errors
    /// * `HashingFailed` - The hashing operation itself failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a plaintext password against a stored digest.
    ///
    /// A mismatch is an `Ok(false)`, not an error. An error is returned
    /// only when the stored digest is structurally invalid (corruption).
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `digest` - Stored bcrypt digest
    ///
    /// # Errors
    /// * `InvalidDigest` - The stored digest could not be parsed
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(password, digest).map_err(|e| PasswordError::InvalidDigest(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
