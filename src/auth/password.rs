use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const PBKDF2_ROUNDS: u32 = 100_000;
const SALT_BYTES: usize = 16;

/// PBKDF2-HMAC-SHA256 digest of a password under a hex-encoded salt,
/// hex-encoded. The salt string itself is the HMAC salt input, matching the
/// stored credential format.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut digest = [0u8; 32];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ROUNDS,
        &mut digest,
    );
    hex::encode(digest)
}

/// Hash a password under a fresh random salt. Returns (hash, salt), both
/// hex-encoded.
pub fn hash_new_password(password: &str) -> (String, String) {
    let mut salt_bytes = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = hex::encode(salt_bytes);
    (hash_password(password, &salt), salt)
}

/// Constant-time check of a password against a stored hash/salt pair.
pub fn verify_password(password: &str, hash: &str, salt: &str) -> bool {
    let candidate = hash_password(password, salt);
    candidate.as_bytes().ct_eq(hash.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic_for_fixed_inputs() {
        let a = hash_password("hunter2", "00112233445566778899aabbccddeeff");
        let b = hash_password("hunter2", "00112233445566778899aabbccddeeff");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn different_salts_produce_different_hashes() {
        let (hash1, salt1) = hash_new_password("hunter2");
        let (hash2, salt2) = hash_new_password("hunter2");
        assert_ne!(salt1, salt2);
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn generated_salt_is_16_hex_encoded_bytes() {
        let (_, salt) = hash_new_password("pw");
        assert_eq!(salt.len(), 32);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn verify_accepts_correct_password_only() {
        let (hash, salt) = hash_new_password("correct horse");
        assert!(verify_password("correct horse", &hash, &salt));
        assert!(!verify_password("wrong horse", &hash, &salt));
        assert!(!verify_password("", &hash, &salt));
    }
}
