use super::Signature;
use crate::hash::DigestAlgorithm;
use crate::key::RsaKey;
use alloc::sync::Arc;

use signature::{hazmat::PrehashVerifier, Verifier};

/// Verifying key for `RSASSA-PKCS1-v1_5` signatures as described in [RFC8017 § 8.2].
///
/// [RFC8017 § 8.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-8.2
#[derive(Debug, Clone)]
pub struct VerifyingKey {
    inner: Arc<RsaKey>,
    algorithm: DigestAlgorithm,
}

impl VerifyingKey {
    /// Create a new verifying key hashing messages with `algorithm`.
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

impl AsRef<RsaKey> for VerifyingKey {
    fn as_ref(&self) -> &RsaKey {
        &self.inner
    }
}

impl Verifier<Signature> for VerifyingKey {
    fn verify(&self, msg: &[u8], signature: &Signature) -> signature::Result<()> {
        self.inner
            .digest_verify(self.algorithm, msg, signature.as_ref())
            .map_err(Into::into)
    }
}

impl PrehashVerifier<Signature> for VerifyingKey {
    fn verify_prehash(&self, prehash: &[u8], signature: &Signature) -> signature::Result<()> {
        self.inner
            .verify(self.algorithm, prehash, signature.as_ref())
            .map_err(Into::into)
    }
}
