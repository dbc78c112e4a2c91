//! PKCS#1 v1.5 block formatting as described in [RFC8017 § 7.2 and § 9.2].
//!
//! [RFC8017 § 7.2 and § 9.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-9.2

use alloc::vec::Vec;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Minimum number of padding bytes in either block type.
const MIN_PS_LEN: usize = 8;

/// Fills the provided slice with random values, which are guaranteed
/// to not be zero.
#[inline]
fn non_zero_random_bytes<R: CryptoRngCore + ?Sized>(rng: &mut R, data: &mut [u8]) {
    rng.fill_bytes(data);

    for el in data {
        while *el == 0u8 {
            rng.fill_bytes(core::slice::from_mut(el));
        }
    }
}

/// Formats `payload` as a type 1 block of `k` bytes:
/// `EM = 0x00 || 0x01 || PS || 0x00 || payload` with `PS` all `0xff`.
#[inline]
pub(crate) fn pkcs1v15_sign_pad(payload: &[u8], k: usize) -> Result<Vec<u8>> {
    if k < payload.len() + 3 + MIN_PS_LEN {
        return Err(Error::MessageTooLong);
    }

    let mut em = vec![0xff; k];
    em[0] = 0;
    em[1] = 1;
    em[k - payload.len() - 1] = 0;
    em[k - payload.len()..].copy_from_slice(payload);
    Ok(em)
}

/// Extracts the payload of a type 1 block.
#[inline]
pub(crate) fn pkcs1v15_sign_unpad(em: &[u8]) -> Result<&[u8]> {
    if em.len() < 3 + MIN_PS_LEN || em[0] != 0 || em[1] != 1 {
        return Err(Error::InvalidPadding);
    }

    let ps_len = em[2..]
        .iter()
        .position(|&b| b != 0xff)
        .ok_or(Error::InvalidPadding)?;
    let sep = 2 + ps_len;
    if ps_len < MIN_PS_LEN || em[sep] != 0 {
        return Err(Error::InvalidPadding);
    }

    Ok(&em[sep + 1..])
}

/// Applied the padding scheme from PKCS#1 v1.5 for encryption.  The message must be no longer than
/// the length of the public modulus minus 11 bytes.
pub(crate) fn pkcs1v15_encrypt_pad<R>(
    rng: &mut R,
    msg: &[u8],
    k: usize,
) -> Result<Zeroizing<Vec<u8>>>
where
    R: CryptoRngCore + ?Sized,
{
    if msg.len() + 3 + MIN_PS_LEN > k {
        return Err(Error::MessageTooLong);
    }

    // EM = 0x00 || 0x02 || PS || 0x00 || M
    let mut em = Zeroizing::new(vec![0u8; k]);
    em[1] = 2;
    non_zero_random_bytes(rng, &mut em[2..k - msg.len() - 1]);
    em[k - msg.len() - 1] = 0;
    em[k - msg.len()..].copy_from_slice(msg);
    Ok(em)
}

/// Removes the encryption padding scheme from PKCS#1 v1.5.
///
/// The block is scanned in constant time; only the final accept/reject
/// decision branches.
#[inline]
pub(crate) fn pkcs1v15_encrypt_unpad(em: &[u8]) -> Result<Vec<u8>> {
    let (valid, index) = decrypt_inner(em)?;
    if valid.unwrap_u8() == 0 {
        return Err(Error::InvalidPadding);
    }

    Ok(em[index as usize..].to_vec())
}

/// Returns whether `em` is a well formed type 2 block and, if so, the
/// offset of the message.
#[inline]
fn decrypt_inner(em: &[u8]) -> Result<(Choice, u32)> {
    if em.len() < 3 + MIN_PS_LEN {
        return Err(Error::InvalidPadding);
    }

    let first_byte_is_zero = em[0].ct_eq(&0u8);
    let second_byte_is_two = em[1].ct_eq(&2u8);

    //   looking_for_index: 1 iff we are still looking for the zero.
    //   index: the offset of the first zero byte.
    let mut looking_for_index = 1u8;
    let mut index = 0u32;

    for (i, el) in em.iter().enumerate().skip(2) {
        let equals0 = el.ct_eq(&0u8);
        index.conditional_assign(&(i as u32), Choice::from(looking_for_index) & equals0);
        looking_for_index.conditional_assign(&0u8, equals0);
    }

    // PS starts two bytes into em, so the separator sits at index >= 10.
    let valid_ps = Choice::from((((2i32 + MIN_PS_LEN as i32 - index as i32 - 1) >> 31) & 1) as u8);
    let valid =
        first_byte_is_zero & second_byte_is_two & Choice::from(!looking_for_index & 1) & valid_ps;
    index = u32::conditional_select(&0, &(index + 1), valid);

    Ok((valid, index))
}
