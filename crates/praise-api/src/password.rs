use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Argon2id hashing with bcrypt accepted for legacy hashes on verify.
pub struct Hasher {
    argon2: Argon2<'static>,
    /// Verified against when the username is unknown, so both login failure
    /// paths cost one full verification.
    dummy_hash: String,
}

impl Hasher {
    pub fn new(params: Params) -> Result<Self, HashError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = hash_with(&argon2, "praise-dummy-password")?;
        Ok(Self { argon2, dummy_hash })
    }

    /// Default Argon2id cost (19 MiB, 2 passes): tens of milliseconds per call.
    pub fn production() -> Result<Self, HashError> {
        Self::new(Params::default())
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        hash_with(&self.argon2, plaintext)
    }

    /// `Ok(false)` means wrong password; `Err` means the stored hash is unusable.
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, HashError> {
        if is_bcrypt(hash) {
            return bcrypt::verify(plaintext, hash).map_err(|_| HashError::MalformedHash);
        }

        let parsed = PasswordHash::new(hash).map_err(|_| HashError::MalformedHash)?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(_) => Err(HashError::MalformedHash),
        }
    }

    /// Burn one verification for a login whose username does not exist.
    pub fn verify_dummy(&self, plaintext: &str) {
        let _ = self.verify(plaintext, &self.dummy_hash);
    }
}

fn hash_with(argon2: &Argon2<'_>, plaintext: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| HashError::Hash(e.to_string()))
}

fn is_bcrypt(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"].iter().any(|p| hash.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Hasher {
        Hasher::new(Params::new(8, 1, 1, None).unwrap()).unwrap()
    }

    #[test]
    fn hash_and_verify() {
        let hasher = cheap();
        let hash = hasher.hash("Kar_TuP5ul").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("Kar_TuP5ul", &hash).unwrap());
        assert!(!hasher.verify("kar_tup5ul", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = cheap();
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn legacy_bcrypt_hash_verifies() {
        let hasher = cheap();
        let legacy = bcrypt::hash("math123", 4).unwrap();
        assert!(hasher.verify("math123", &legacy).unwrap());
        assert!(!hasher.verify("math124", &legacy).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_panic() {
        let hasher = cheap();
        assert!(matches!(hasher.verify("x", "not a hash"), Err(HashError::MalformedHash)));
        assert!(matches!(hasher.verify("x", "$2b$garbage"), Err(HashError::MalformedHash)));
    }
}
