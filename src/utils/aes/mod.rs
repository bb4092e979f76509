use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce
};
use rand::{CryptoRng, RngCore};
use sha3::{Digest, Sha3_256};
use crate::error::McpAbeError;

/// Length of the AES-GCM nonce that prefixes every symmetric ciphertext
const NONCE_LEN: usize = 12;

/// Key Encapsulation Mechanism (AES-256 Encryption Function)
///
/// Derives an AES-256 key from `msg` and returns `nonce | ciphertext | tag`.
pub fn encrypt_symmetric<G, R>(msg: G, plaintext: &[u8], rng: &mut R) -> Result<Vec<u8>, McpAbeError>
where
    G: Into<Vec<u8>>,
    R: RngCore + CryptoRng,
{
    let key = kdf(msg);
    let cipher = Aes256Gcm::new(&key);
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce);
    let mut ct = cipher.encrypt(Nonce::from_slice(&nonce), plaintext)?;
    ct.splice(0..0, nonce.iter().cloned());
    Ok(ct)
}

/// Key Encapsulation Mechanism (AES-256 Decryption Function)
///
/// Fails if `nonce_ct` was not produced under the key derived from `msg`.
pub fn decrypt_symmetric<G: Into<Vec<u8>>>(msg: G, nonce_ct: &[u8]) -> Result<Vec<u8>, McpAbeError> {
    if nonce_ct.len() < NONCE_LEN {
        return Err(McpAbeError::new("symmetric ciphertext is shorter than its nonce"));
    }
    let (nonce, ct) = nonce_ct.split_at(NONCE_LEN);
    let key = kdf(msg);
    let cipher = Aes256Gcm::new(&key);
    Ok(cipher.decrypt(Nonce::from_slice(nonce), ct)?)
}

/// Key derivation function - turns anything implementing `Into<Vec<u8>>` into a key for AES-256
fn kdf<G: Into<Vec<u8>>>(data: G) -> Key<Aes256Gcm> {
    let mut hasher = Sha3_256::new();
    hasher.update(data.into());
    hasher.finalize()
}
