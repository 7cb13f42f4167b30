use assist_lib::sec::chacha;

use base64::{Engine, engine::general_purpose::STANDARD};
use argon2::Variant;
use rand::RngCore;

use crate::net::error::Error as NetError;

pub const SALT_LEN: usize = 32;

pub type Salt = [u8; SALT_LEN];

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    Rand(#[from] rand::Error),

    #[error(transparent)]
    Crypto(#[from] chacha::CryptoError),

    #[error(transparent)]
    Argon2(#[from] argon2::Error),
}

impl From<PasswordError> for NetError {
    fn from(err: PasswordError) -> Self {
        NetError::new().source(err)
    }
}

pub fn gen_salt() -> Result<Salt, rand::Error> {
    let mut salt = [0u8; SALT_LEN];

    rand::thread_rng().try_fill_bytes(&mut salt)?;

    Ok(salt)
}

pub fn gen_hash(password: &str, salt: &[u8]) -> Result<String, argon2::Error> {
    let config = argon2::Config {
        mem_cost: 19456,
        variant: Variant::Argon2id,
        ..argon2::Config::default()
    };

    argon2::hash_encoded(
        password.as_bytes(),
        salt,
        &config
    )
}

/// argon2id hash of the password, encrypted with the pepper and base64
/// encoded for storage
pub fn create(password: &str, pepper: &chacha::Key) -> Result<String, PasswordError> {
    let salt = gen_salt()?;
    let hash = gen_hash(password, &salt)?;

    let encrypted = chacha::encrypt_data(pepper, hash.as_bytes())?;

    Ok(STANDARD.encode(encrypted))
}

pub fn verify<C>(stored: &str, check: C, pepper: &chacha::Key) -> Result<bool, PasswordError>
where
    C: AsRef<[u8]>
{
    let decoded = STANDARD.decode(stored)?;
    let decrypted = chacha::decrypt_data(pepper, &decoded)?;
    let hash = std::str::from_utf8(&decrypted)?;

    Ok(argon2::verify_encoded(hash, check.as_ref())?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sec::state::test_sec;

    #[test]
    fn create_then_verify() {
        let sec = test_sec();
        let stored = create("hunter22", sec.pepper()).unwrap();

        assert!(verify(&stored, "hunter22", sec.pepper()).unwrap());
        assert!(!verify(&stored, "hunter23", sec.pepper()).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let sec = test_sec();

        let a = create("same password", sec.pepper()).unwrap();
        let b = create("same password", sec.pepper()).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn wrong_pepper_fails() {
        let sec = test_sec();
        let stored = create("hunter22", sec.pepper()).unwrap();

        let result = verify(&stored, "hunter22", &chacha::empty_key());

        assert!(matches!(result, Err(PasswordError::Crypto(_))));
    }
}
