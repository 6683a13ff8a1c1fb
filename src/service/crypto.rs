use bcrypt::{hash, verify, DEFAULT_COST};

use crate::errors::ApiError;

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    hash(password, DEFAULT_COST).map_err(|err| {
        log::error!("failed to hash password: {}", err);
        ApiError::Internal("Failed to hash password".to_string())
    })
}

/// Any verification failure, including a malformed stored hash, reads as a
/// mismatch; this never errors out to the caller.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    verify(password, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        // low cost to keep the test quick
        let hashed = bcrypt::hash("hunter42", 4).unwrap();
        assert!(verify_password("hunter42", &hashed));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hashed = bcrypt::hash("hunter42", 4).unwrap();
        assert!(!verify_password("hunter43", &hashed));
    }

    #[test]
    fn malformed_hash_reads_as_mismatch_not_error() {
        assert!(!verify_password("hunter42", "definitely-not-a-bcrypt-hash"));
    }

    #[test]
    fn hashes_are_salted() {
        let first = bcrypt::hash("hunter42", 4).unwrap();
        let second = bcrypt::hash("hunter42", 4).unwrap();
        assert_ne!(first, second);
    }
}
