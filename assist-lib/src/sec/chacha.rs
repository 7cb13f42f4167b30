use chacha20poly1305::{
    aead::{Aead, AeadCore, OsRng},
    XChaCha20Poly1305,
    KeyInit,
    XNonce,
};

pub const NONCE_LEN: usize = 24;
pub const KEY_LEN: usize = 32;

pub type Key = [u8; KEY_LEN];

#[inline]
pub fn empty_key() -> Key {
    [0; KEY_LEN]
}

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid data provided")]
    InvalidData,

    #[error("invalid key length")]
    InvalidKey,

    #[error("data encryption failed")]
    EncryptFailed,

    #[error("data decryption failed")]
    DecryptFailed,
}

/// splits the leading nonce from the cipher text
fn split_nonce(data: &[u8]) -> Result<(&XNonce, &[u8]), CryptoError> {
    if data.len() < NONCE_LEN {
        return Err(CryptoError::InvalidData);
    }

    let (nonce, cipher_text) = data.split_at(NONCE_LEN);

    Ok((XNonce::from_slice(nonce), cipher_text))
}

pub fn decrypt_data(key: &Key, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let (nonce, encrypted) = split_nonce(data)?;

    let cipher = XChaCha20Poly1305::new_from_slice(key)
        .map_err(|_| CryptoError::InvalidKey)?;

    cipher.decrypt(nonce, encrypted)
        .map_err(|_| CryptoError::DecryptFailed)
}

/// encrypts with a random nonce, the nonce is prepended to the result
pub fn encrypt_data(key: &Key, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
    let cipher = XChaCha20Poly1305::new_from_slice(key)
        .map_err(|_| CryptoError::InvalidKey)?;

    let encrypted = cipher.encrypt(&nonce, data)
        .map_err(|_| CryptoError::EncryptFailed)?;

    let mut rtn = Vec::with_capacity(NONCE_LEN + encrypted.len());
    rtn.extend_from_slice(nonce.as_slice());
    rtn.extend(encrypted);

    Ok(rtn)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decrypts_what_it_encrypts() {
        let bytes = b"$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";
        let key = [7u8; KEY_LEN];

        let encrypted = encrypt_data(&key, bytes).expect("failed to encrypt data");

        assert_ne!(&encrypted[NONCE_LEN..], bytes.as_slice());

        let decrypted = decrypt_data(&key, &encrypted).expect("failed to decrypt data");

        assert_eq!(bytes.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn wrong_key_fails() {
        let encrypted = encrypt_data(&[1u8; KEY_LEN], b"secret").unwrap();

        assert!(matches!(
            decrypt_data(&empty_key(), &encrypted),
            Err(CryptoError::DecryptFailed)
        ));
    }

    #[test]
    fn short_data_is_invalid() {
        assert!(matches!(
            decrypt_data(&empty_key(), &[0u8; 4]),
            Err(CryptoError::InvalidData)
        ));
    }
}
