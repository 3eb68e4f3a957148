use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CipherError {
    #[error("Could not encrypt mailing address: {0}")]
    EncryptionFailed(String),
    #[error("Could not decrypt mailing address: {0}")]
    DecryptionFailed(String),
}

/// Capability for protecting mailing addresses at rest.
///
/// The engine stores only what `encrypt` returns and hands ciphertext back to `decrypt` when the
/// fulfilment path needs the plaintext. The mechanism is supplied by the deployment.
pub trait AddressCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError>;
    fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError>;
}

/// Identity cipher for development and tests. Deployments are expected to wire a real
/// implementation; this one stores the address as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCipher;

impl AddressCipher for PassthroughCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        Ok(plaintext.to_string())
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, CipherError> {
        Ok(ciphertext.to_string())
    }
}
