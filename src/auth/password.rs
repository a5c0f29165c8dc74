use sha2::{Digest, Sha256};
use uuid::Uuid;

pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Salted hash stored as "salt$digest". The salt is a fresh uuid so equal
/// passwords never share a stored hash.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = sha256_hex(&format!("{}{}", salt, password));
    format!("{}${}", salt, digest)
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    sha256_hex(&format!("{}{}", salt, password)) == digest
}
