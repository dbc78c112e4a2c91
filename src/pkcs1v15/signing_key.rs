use super::{Signature, VerifyingKey};
use crate::hash::DigestAlgorithm;
use crate::key::RsaKey;
use alloc::sync::Arc;

use signature::{hazmat::PrehashSigner, Keypair, Signer};

/// Signing key for `RSASSA-PKCS1-v1_5` signatures as described in [RFC8017 § 8.2].
///
/// Holds a shared reference to the key, so the key's method `finish` hook
/// runs only once the last signing or verifying key is dropped.
///
/// [RFC8017 § 8.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-8.2
#[derive(Debug, Clone)]
pub struct SigningKey {
    inner: Arc<RsaKey>,
    algorithm: DigestAlgorithm,
}

impl SigningKey {
    /// Create a new signing key hashing messages with `algorithm`.
    pub fn new(key: Arc<RsaKey>, algorithm: DigestAlgorithm) -> Self {
        Self {
            inner: key,
            algorithm,
        }
    }

    /// The digest algorithm messages are hashed with.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}

impl AsRef<RsaKey> for SigningKey {
    fn as_ref(&self) -> &RsaKey {
        &self.inner
    }
}

impl Signer<Signature> for SigningKey {
    fn try_sign(&self, msg: &[u8]) -> signature::Result<Signature> {
        Ok(self.inner.digest_sign(self.algorithm, msg)?.into())
    }
}

impl PrehashSigner<Signature> for SigningKey {
    fn sign_prehash(&self, prehash: &[u8]) -> signature::Result<Signature> {
        Ok(self.inner.sign(self.algorithm, prehash)?.into())
    }
}

impl Keypair for SigningKey {
    type VerifyingKey = VerifyingKey;

    fn verifying_key(&self) -> Self::VerifyingKey {
        VerifyingKey::new(Arc::clone(&self.inner), self.algorithm)
    }
}
