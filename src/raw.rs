//! Raw RSA operations on [`RsaKey`]: the private and public transforms with
//! optional PKCS#1 v1.5 padding, dispatched to the bound method when it
//! overrides them.

use alloc::vec::Vec;
use num_bigint::BigUint;
use rand_core::OsRng;
use zeroize::Zeroizing;

use crate::algorithms::pad::{uint_to_be_pad, uint_to_zeroizing_be_pad};
use crate::algorithms::pkcs1v15::{
    pkcs1v15_encrypt_pad, pkcs1v15_encrypt_unpad, pkcs1v15_sign_pad, pkcs1v15_sign_unpad,
};
use crate::algorithms::rsa::{rsa_decrypt_and_check, rsa_encrypt};
use crate::check::check_public_component;
use crate::errors::{Error, Result};
use crate::key::RsaKey;
use crate::method::{legacy_output_len, Capabilities};
use crate::padding::Padding;
use crate::self_test::ensure_self_test;

impl RsaKey {
    /// Pads `input` and applies the private-key operation, writing the
    /// result to `out`. Returns the number of bytes written, which is the key
    /// size for the built-in implementation.
    pub fn sign_raw(&self, out: &mut [u8], input: &[u8], padding: Padding) -> Result<usize> {
        ensure_self_test()?;
        self.sign_raw_no_self_test(out, input, padding)
    }

    /// Applies the public-key operation to `sig` and removes the padding,
    /// writing the recovered payload to `out`. Returns its length.
    pub fn verify_raw(&self, out: &mut [u8], sig: &[u8], padding: Padding) -> Result<usize> {
        ensure_self_test()?;
        self.verify_raw_no_self_test(out, sig, padding)
    }

    /// Encrypts `input` with the public key.
    pub fn encrypt(&self, input: &[u8], padding: Padding) -> Result<Vec<u8>> {
        ensure_self_test()?;

        let k = self.size();
        if let Some(method) = self.method_override(Capabilities::ENCRYPT) {
            let mut out = vec![0u8; k];
            let len = legacy_output_len(method.encrypt(self, &mut out, input, padding), k)?;
            out.truncate(len);
            return Ok(out);
        }

        let (n, e) = self.public_parts()?;
        let em = match padding {
            Padding::Pkcs1 => pkcs1v15_encrypt_pad(&mut OsRng, input, k)?,
            Padding::None if input.len() == k => Zeroizing::new(input.to_vec()),
            Padding::None => return Err(Error::DataLengthMismatch),
        };

        let m = Zeroizing::new(BigUint::from_bytes_be(&em));
        if &*m >= n {
            return Err(Error::DataTooLargeForModulus);
        }
        uint_to_be_pad(&rsa_encrypt(n, e, &m), k)
    }

    /// Decrypts `input` with the private key.
    pub fn decrypt(&self, input: &[u8], padding: Padding) -> Result<Vec<u8>> {
        ensure_self_test()?;

        let k = self.size();
        if let Some(method) = self.method_override(Capabilities::DECRYPT) {
            let mut out = Zeroizing::new(vec![0u8; k]);
            let len = legacy_output_len(method.decrypt(self, &mut out, input, padding), k)?;
            return Ok(out[..len].to_vec());
        }

        if input.len() != k {
            return Err(Error::DataLengthMismatch);
        }
        let em = self.private_op(input, k)?;
        match padding {
            Padding::Pkcs1 => pkcs1v15_encrypt_unpad(&em),
            Padding::None => Ok(em.to_vec()),
        }
    }

    /// Applies the private-key operation to `input` without padding, writing
    /// exactly `out.len()` bytes.
    pub fn private_transform(&self, out: &mut [u8], input: &[u8]) -> Result<()> {
        ensure_self_test()?;

        if let Some(method) = self.method_override(Capabilities::PRIVATE_TRANSFORM) {
            return method.private_transform(self, out, input);
        }

        if out.len() != input.len() {
            return Err(Error::DataLengthMismatch);
        }
        let result = self.private_op(input, out.len())?;
        out.copy_from_slice(&result);
        Ok(())
    }

    pub(crate) fn sign_raw_no_self_test(
        &self,
        out: &mut [u8],
        input: &[u8],
        padding: Padding,
    ) -> Result<usize> {
        if let Some(method) = self.method_override(Capabilities::SIGN_RAW) {
            return legacy_output_len(method.sign_raw(self, out, input, padding), out.len());
        }

        let k = self.size();
        if out.len() < k {
            return Err(Error::OutputBufferTooSmall);
        }

        let em = match padding {
            Padding::Pkcs1 => Zeroizing::new(pkcs1v15_sign_pad(input, k)?),
            Padding::None if input.len() == k => Zeroizing::new(input.to_vec()),
            Padding::None => return Err(Error::DataLengthMismatch),
        };

        let sig = self.private_op(&em, k)?;
        out[..k].copy_from_slice(&sig);
        Ok(k)
    }

    pub(crate) fn verify_raw_no_self_test(
        &self,
        out: &mut [u8],
        sig: &[u8],
        padding: Padding,
    ) -> Result<usize> {
        if let Some(method) = self.method_override(Capabilities::VERIFY_RAW) {
            return legacy_output_len(method.verify_raw(self, out, sig, padding), out.len());
        }

        let (n, e) = self.public_parts()?;
        let k = self.size();
        if out.len() < k {
            return Err(Error::OutputBufferTooSmall);
        }
        if sig.len() != k {
            return Err(Error::DataLengthMismatch);
        }

        let s = BigUint::from_bytes_be(sig);
        if &s >= n {
            return Err(Error::DataTooLargeForModulus);
        }
        let em = uint_to_be_pad(&rsa_encrypt(n, e, &s), k)?;

        let payload = match padding {
            Padding::Pkcs1 => pkcs1v15_sign_unpad(&em)?,
            Padding::None => &em[..],
        };
        out[..payload.len()].copy_from_slice(payload);
        Ok(payload.len())
    }

    /// Validated `(n, e)` for a public-key operation.
    fn public_parts(&self) -> Result<(&BigUint, &BigUint)> {
        let (Some(n), Some(e)) = (self.n(), self.e()) else {
            return Err(Error::MissingValue);
        };
        check_public_component(self)?;
        Ok((n, e))
    }

    /// `input^d mod n`, left padded to `len` bytes.
    fn private_op(&self, input: &[u8], len: usize) -> Result<Zeroizing<Vec<u8>>> {
        let c = Zeroizing::new(BigUint::from_bytes_be(input));
        let m = if self.blinding_on() {
            rsa_decrypt_and_check(self, Some(&mut OsRng), &c)?
        } else {
            rsa_decrypt_and_check::<OsRng>(self, None, &c)?
        };
        uint_to_zeroizing_be_pad(m, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 61 * 53 = 3233 is too small for PKCS#1 padding but exercises the raw paths.
    fn toy_key() -> RsaKey {
        let big = |v: u32| BigUint::from(v);
        RsaKey::new_private(
            &big(3233),
            &big(17),
            &big(2753),
            &big(61),
            &big(53),
            &big(53),
            &big(49),
            &big(38),
        )
        .unwrap()
    }

    #[test]
    fn test_unpadded_round_trip() {
        let key = toy_key();
        let ciphertext = key.encrypt(&[0x00, 0x41], Padding::None).unwrap();
        assert_eq!(ciphertext, 2790u16.to_be_bytes());
        assert_eq!(key.decrypt(&ciphertext, Padding::None).unwrap(), [0x00, 0x41]);

        let mut sig = [0u8; 2];
        assert_eq!(key.sign_raw(&mut sig, &[0x00, 0x41], Padding::None), Ok(2));
        let mut recovered = [0u8; 2];
        assert_eq!(key.verify_raw(&mut recovered, &sig, Padding::None), Ok(2));
        assert_eq!(recovered, [0x00, 0x41]);

        let mut out = [0u8; 2];
        key.private_transform(&mut out, &2790u16.to_be_bytes()).unwrap();
        assert_eq!(out, [0x00, 0x41]);
    }

    #[test]
    fn test_length_errors() {
        let key = toy_key();
        assert_eq!(key.encrypt(&[1], Padding::None), Err(Error::DataLengthMismatch));
        assert_eq!(key.decrypt(&[1, 2, 3], Padding::None), Err(Error::DataLengthMismatch));
        assert_eq!(
            key.encrypt(&[0xff, 0xff], Padding::None),
            Err(Error::DataTooLargeForModulus)
        );
        assert_eq!(key.encrypt(&[], Padding::Pkcs1), Err(Error::MessageTooLong));

        let mut short = [0u8; 1];
        assert_eq!(
            key.sign_raw(&mut short, &[0, 1], Padding::None),
            Err(Error::OutputBufferTooSmall)
        );
        let mut out = [0u8; 3];
        assert_eq!(
            key.private_transform(&mut out, &[0, 1]),
            Err(Error::DataLengthMismatch)
        );
    }

    #[test]
    fn test_public_key_cannot_sign() {
        let key = RsaKey::new_public(&BigUint::from(3233u32), &BigUint::from(17u32)).unwrap();
        let mut out = [0u8; 2];
        assert_eq!(
            key.sign_raw(&mut out, &[0, 1], Padding::None),
            Err(Error::MissingValue)
        );
    }
}
