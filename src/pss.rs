//! Support for the [Probabilistic Signature Scheme] (PSS) a.k.a. RSASSA-PSS.
//!
//! Designed by Mihir Bellare and Phillip Rogaway. Specified in [RFC8017 § 8.1].
//!
//! The message digest and the MGF1 digest are chosen independently; the
//! MGF1 digest defaults to the message digest.
//!
//! [Probabilistic Signature Scheme]: https://en.wikipedia.org/wiki/Probabilistic_signature_scheme
//! [RFC8017 § 8.1]: https://datatracker.ietf.org/doc/html/rfc8017#section-8.1

use alloc::vec::Vec;
use rand_core::{OsRng, RngCore};
use zeroize::Zeroizing;

use crate::algorithms::pad::left_pad;
use crate::algorithms::pss::{emsa_pss_encode, emsa_pss_verify};
use crate::errors::{Error, Result};
use crate::hash::DigestAlgorithm;
use crate::key::RsaKey;
use crate::padding::Padding;
use crate::self_test::ensure_self_test;

/// Salt length of a PSS signature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SaltLength {
    /// As long as the message digest.
    #[default]
    Digest,
    /// When signing, the longest salt that fits the key. When verifying,
    /// whatever length the signature was produced with.
    Auto,
    /// Exactly this many bytes.
    Exact(usize),
}

impl RsaKey {
    /// Signs `digest`, computed with `md`, using RSASSA-PSS with MGF1 over
    /// `mgf1_md` (or `md` when `None`).
    pub fn sign_pss_mgf1(
        &self,
        digest: &[u8],
        md: DigestAlgorithm,
        mgf1_md: Option<DigestAlgorithm>,
        salt_len: SaltLength,
    ) -> Result<Vec<u8>> {
        ensure_self_test()?;

        if digest.len() != md.output_size() {
            return Err(Error::InvalidMessageLength);
        }

        let mut hash = md.hasher()?;
        let mut mgf_hash = mgf1_md.unwrap_or(md).hasher()?;

        let k = self.size();
        let bits = self.bits();
        if bits < 2 {
            return Err(Error::MessageTooLong);
        }
        let em_bits = bits - 1;
        let em_len = em_bits.div_ceil(8);
        let h_len = md.output_size();

        // Longest salt that fits; bounds the allocation below.
        let max_s_len = em_len
            .checked_sub(h_len + 2)
            .ok_or(Error::MessageTooLong)?;
        let s_len = match salt_len {
            SaltLength::Digest => h_len,
            SaltLength::Exact(len) => len,
            SaltLength::Auto => max_s_len,
        };
        if s_len > max_s_len {
            return Err(Error::MessageTooLong);
        }

        let mut salt = Zeroizing::new(vec![0u8; s_len]);
        OsRng.fill_bytes(&mut salt);

        let em = emsa_pss_encode(digest, em_bits, &salt, &mut *hash, &mut *mgf_hash)?;
        let em = Zeroizing::new(left_pad(&em, k)?);

        let mut sig = vec![0u8; k];
        let len = self.sign_raw_no_self_test(&mut sig, &em, Padding::None)?;
        sig.truncate(len);
        Ok(sig)
    }

    /// Verifies an RSASSA-PSS signature over `digest`, computed with `md`,
    /// with MGF1 over `mgf1_md` (or `md` when `None`).
    pub fn verify_pss_mgf1(
        &self,
        digest: &[u8],
        md: DigestAlgorithm,
        mgf1_md: Option<DigestAlgorithm>,
        salt_len: SaltLength,
        sig: &[u8],
    ) -> Result<()> {
        ensure_self_test()?;

        if digest.len() != md.output_size() {
            return Err(Error::InvalidMessageLength);
        }

        let mut hash = md.hasher()?;
        let mut mgf_hash = mgf1_md.unwrap_or(md).hasher()?;

        let k = self.size();
        let mut em = vec![0u8; k];
        let len = self.verify_raw_no_self_test(&mut em, sig, Padding::None)?;
        if len != k {
            return Err(Error::Internal);
        }

        let s_len = match salt_len {
            SaltLength::Digest => Some(md.output_size()),
            SaltLength::Exact(len) => Some(len),
            SaltLength::Auto => None,
        };

        emsa_pss_verify(
            digest,
            &mut em,
            s_len,
            &mut *hash,
            &mut *mgf_hash,
            self.bits(),
        )
    }
}
