//! Hashing utilities

use sha2::{Digest, Sha256};

/// First 8 bytes of the SHA-256 digest of the input, in digest order.
pub fn sha256_first_8(input: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let hash = hasher.finalize();

    let mut result = [0u8; 8];
    result.copy_from_slice(&hash[..8]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(sha256_first_8("account:Foo"), sha256_first_8("account:Foo"));
        assert_ne!(sha256_first_8("account:Foo"), sha256_first_8("account:Bar"));
    }
}
