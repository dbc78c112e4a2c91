//! PKCS#1 v1.5 signatures as described in [RFC8017 § 8.2].
//!
//! # Usage
//!
//! [`RsaKey::sign`] and [`RsaKey::verify`] work on a precomputed digest;
//! [`RsaKey::digest_sign`] and [`RsaKey::digest_verify`] hash the message
//! first. [`SigningKey`] and [`VerifyingKey`] expose the same operations
//! through the [`signature`](::signature) traits.
//!
//! [RFC8017 § 8.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-8.2

mod signature;
mod signing_key;
mod verifying_key;

pub use self::{signature::Signature, signing_key::SigningKey, verifying_key::VerifyingKey};

use alloc::borrow::Cow;
use alloc::vec::Vec;
use subtle::ConstantTimeEq;

use crate::errors::{Error, Result};
use crate::hash::{DigestAlgorithm, MD5_SHA1_LENGTH};
use crate::key::RsaKey;
use crate::method::Capabilities;
use crate::padding::Padding;
use crate::self_test::ensure_self_test;

/// Checks that `len` is the digest length of `algorithm`.
pub fn check_digest_size(algorithm: DigestAlgorithm, len: usize) -> Result<()> {
    if algorithm == DigestAlgorithm::Md5Sha1 {
        if len != MD5_SHA1_LENGTH {
            return Err(Error::InvalidMessageLength);
        }
        return Ok(());
    }

    if algorithm.pkcs1_prefix().is_none() {
        return Err(Error::UnknownDigestAlgorithm);
    }
    if len != algorithm.output_size() {
        return Err(Error::InvalidMessageLength);
    }
    Ok(())
}

/// Builds the `DigestInfo` encoding of `digest`: the DER prefix for
/// `algorithm` followed by the digest.
///
/// The combined MD5+SHA-1 digest carries no prefix and is returned as is.
pub fn add_pkcs1_prefix(algorithm: DigestAlgorithm, digest: &[u8]) -> Result<Cow<'_, [u8]>> {
    check_digest_size(algorithm, digest.len())?;
    if algorithm == DigestAlgorithm::Md5Sha1 {
        return Ok(Cow::Borrowed(digest));
    }

    let prefix = algorithm
        .pkcs1_prefix()
        .ok_or(Error::UnknownDigestAlgorithm)?;
    let len = prefix
        .len()
        .checked_add(digest.len())
        .ok_or(Error::MessageTooLong)?;

    let mut encoded = Vec::new();
    encoded
        .try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailure)?;
    encoded.extend_from_slice(prefix);
    encoded.extend_from_slice(digest);
    Ok(Cow::Owned(encoded))
}

impl RsaKey {
    /// Signs `digest`, computed with `algorithm`, using PKCS#1 v1.5 padding.
    pub fn sign(&self, algorithm: DigestAlgorithm, digest: &[u8]) -> Result<Vec<u8>> {
        ensure_self_test()?;
        self.sign_no_self_test(algorithm, digest)
    }

    /// Verifies a PKCS#1 v1.5 signature over `digest`, computed with
    /// `algorithm`.
    pub fn verify(&self, algorithm: DigestAlgorithm, digest: &[u8], sig: &[u8]) -> Result<()> {
        ensure_self_test()?;
        self.verify_no_self_test(algorithm, digest, sig)
    }

    /// Hashes `msg` with `algorithm` and signs the digest.
    pub fn digest_sign(&self, algorithm: DigestAlgorithm, msg: &[u8]) -> Result<Vec<u8>> {
        ensure_self_test()?;
        self.sign_no_self_test(algorithm, &algorithm.digest(msg))
    }

    /// Hashes `msg` with `algorithm` and verifies `sig` over the digest.
    pub fn digest_verify(&self, algorithm: DigestAlgorithm, msg: &[u8], sig: &[u8]) -> Result<()> {
        ensure_self_test()?;
        self.verify_no_self_test(algorithm, &algorithm.digest(msg), sig)
    }

    pub(crate) fn sign_no_self_test(
        &self,
        algorithm: DigestAlgorithm,
        digest: &[u8],
    ) -> Result<Vec<u8>> {
        check_digest_size(algorithm, digest.len())?;

        if let Some(method) = self.method_override(Capabilities::SIGN) {
            return method.sign(self, algorithm, digest);
        }

        let encoded = add_pkcs1_prefix(algorithm, digest)?;
        let mut sig = vec![0u8; self.size()];
        let len = self.sign_raw_no_self_test(&mut sig, &encoded, Padding::Pkcs1)?;
        sig.truncate(len);
        Ok(sig)
    }

    pub(crate) fn verify_no_self_test(
        &self,
        algorithm: DigestAlgorithm,
        digest: &[u8],
        sig: &[u8],
    ) -> Result<()> {
        if self.n().is_none() || self.e().is_none() {
            return Err(Error::MissingValue);
        }
        if algorithm == DigestAlgorithm::Md5Sha1 && digest.len() != MD5_SHA1_LENGTH {
            return Err(Error::InvalidMessageLength);
        }

        let mut recovered = vec![0u8; self.size()];
        let len = self.verify_raw_no_self_test(&mut recovered, sig, Padding::Pkcs1)?;
        let expected = add_pkcs1_prefix(algorithm, digest)?;

        if len != expected.len() {
            return Err(Error::BadSignatureLength);
        }
        if !bool::from(recovered[..len].ct_eq(&expected)) {
            return Err(Error::SignatureMismatch);
        }
        Ok(())
    }
}
