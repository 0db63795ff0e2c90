//! Password-based key derivation and cipher.
//!
//! Key material comes from PBKDF2-HMAC-SHA1 over the `(key, salt)` string
//! pair at a fixed round count: one 48-byte stream, sliced into the AES-256
//! key (first 32 bytes) and the CBC IV (next 16 bytes). Nothing about the
//! derivation is stored alongside the ciphertext, so the same credentials
//! always reproduce the same key and IV.
//!
//! Because the IV is derived rather than random, encrypting the same
//! plaintext under the same credentials yields identical ciphertext. There
//! is also no authentication tag: wrong credentials are detected through
//! padding failure at best. Callers get confidentiality, not integrity or
//! semantic security.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;

use crate::error::SaveLoadError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

/// Fixed round count. Changing this invalidates every existing save file.
const DERIVE_ROUNDS: u32 = 1000;

/// Validated encryption credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    salt: String,
}

impl Credentials {
    /// Validates that neither key nor salt is empty.
    pub fn new(key: &str, salt: &str) -> Result<Self, SaveLoadError> {
        if key.is_empty() {
            return Err(SaveLoadError::InvalidCredentials("key must not be empty"));
        }
        if salt.is_empty() {
            return Err(SaveLoadError::InvalidCredentials("salt must not be empty"));
        }
        Ok(Self {
            key: key.to_string(),
            salt: salt.to_string(),
        })
    }
}

/// Derives the cipher key and IV from the credential pair.
fn derive_key_iv(credentials: &Credentials) -> ([u8; KEY_LEN], [u8; IV_LEN]) {
    let mut stream = [0u8; KEY_LEN + IV_LEN];
    pbkdf2_hmac::<Sha1>(
        credentials.key.as_bytes(),
        credentials.salt.as_bytes(),
        DERIVE_ROUNDS,
        &mut stream,
    );

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    key.copy_from_slice(&stream[..KEY_LEN]);
    iv.copy_from_slice(&stream[KEY_LEN..]);
    (key, iv)
}

/// Encrypts a plaintext buffer under the given credentials.
pub fn encrypt(plaintext: &[u8], credentials: &Credentials) -> Vec<u8> {
    let (key, iv) = derive_key_iv(credentials);
    Aes256CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypts a ciphertext buffer under the given credentials.
///
/// Wrong credentials surface as a padding failure. Detection is
/// best-effort: no authentication tag is stored.
pub fn decrypt(ciphertext: &[u8], credentials: &Credentials) -> Result<Vec<u8>, SaveLoadError> {
    let (key, iv) = derive_key_iv(credentials);
    Aes256CbcDec::new(&key.into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| SaveLoadError::Decryption("ciphertext did not decrypt under the given credentials".to_string()))
}

#[cfg(test)]
mod test {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("TestKey", "TestSalt").unwrap()
    }

    #[test]
    fn round_trip() {
        let plaintext = b"some save data with a bit of length to cross a block boundary";
        let ciphertext = encrypt(plaintext, &credentials());
        assert_ne!(&ciphertext[..], &plaintext[..]);
        let decrypted = decrypt(&ciphertext, &credentials()).unwrap();
        assert_eq!(&decrypted[..], &plaintext[..]);
    }

    #[test]
    fn empty_plaintext_round_trip() {
        let ciphertext = encrypt(b"", &credentials());
        // PKCS#7 always emits at least one padded block
        assert_eq!(ciphertext.len(), 16);
        let decrypted = decrypt(&ciphertext, &credentials()).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn same_plaintext_same_ciphertext() {
        // The IV is derived from the credentials, so ciphertext is
        // deterministic per credential pair. Pinned on purpose: existing
        // save files depend on this derivation.
        let a = encrypt(b"deterministic", &credentials());
        let b = encrypt(b"deterministic", &credentials());
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_credentials_fail() {
        let ciphertext = encrypt(b"secret payload", &credentials());
        let other = Credentials::new("OtherKey", "OtherSalt").unwrap();
        match decrypt(&ciphertext, &other) {
            Err(SaveLoadError::Decryption(_)) => {}
            Ok(decrypted) => assert_ne!(&decrypted[..], b"secret payload"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_key_rejected() {
        match Credentials::new("", "salt") {
            Err(SaveLoadError::InvalidCredentials(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_salt_rejected() {
        match Credentials::new("key", "") {
            Err(SaveLoadError::InvalidCredentials(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn different_salt_different_ciphertext() {
        let a = encrypt(b"payload", &Credentials::new("key", "salt-a").unwrap());
        let b = encrypt(b"payload", &Credentials::new("key", "salt-b").unwrap());
        assert_ne!(a, b);
    }
}
