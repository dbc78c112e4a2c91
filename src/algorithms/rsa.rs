//! Textbook RSA over [`RsaKey`] components.

use alloc::borrow::Cow;
use num_bigint::{BigInt, BigUint, IntoBigInt, IntoBigUint, ModInverse, RandBigInt};
use num_traits::{One, Signed, Zero};
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::errors::{Error, Result};
use crate::key::{Precomputed, RsaKey};

/// Raw public-key operation `m^e mod n`. The caller guarantees `n != 0`.
#[inline]
pub(crate) fn rsa_encrypt(n: &BigUint, e: &BigUint, m: &BigUint) -> BigUint {
    m.modpow(e, n)
}

/// Raw private-key operation `c^d mod n`.
///
/// Blinds the input when `rng` is given and the key carries a public
/// exponent. Uses the CRT when the key has its factors. When `e` is present
/// the result is re-encrypted and compared with `c` to catch faults in the
/// CRT computation.
pub(crate) fn rsa_decrypt_and_check<R: CryptoRngCore>(
    key: &RsaKey,
    rng: Option<&mut R>,
    c: &BigUint,
) -> Result<BigUint> {
    let (Some(n), Some(d)) = (key.n(), key.d()) else {
        return Err(Error::MissingValue);
    };
    if n.is_zero() {
        return Err(Error::Internal);
    }
    if c >= n {
        return Err(Error::DataTooLargeForModulus);
    }

    let e = key.e();
    let mut unblinder = None;
    let c_in = match (rng, e) {
        (Some(rng), Some(e)) => {
            let (blinded, ir) = blind(rng, n, e, c);
            unblinder = Some(ir);
            Cow::Owned(blinded)
        }
        _ => Cow::Borrowed(c),
    };

    let mut m = match (key.precomputed()?, key.p(), key.q()) {
        (Some(values), Some(p), Some(q)) => crt(&c_in, &values, p, q)?,
        _ => c_in.modpow(d, n),
    };

    if let Some(mut ir) = unblinder {
        let unblinded = (&m * &ir) % n;
        m.zeroize();
        ir.zeroize();
        m = unblinded;
    }

    if let Some(e) = e {
        if &rsa_encrypt(n, e, &m) != c {
            m.zeroize();
            return Err(Error::Internal);
        }
    }

    Ok(m)
}

fn crt(c: &BigUint, values: &Precomputed, p: &BigUint, q: &BigUint) -> Result<BigUint> {
    let mut m1 = c.modpow(&values.dp, p).into_bigint().ok_or(Error::Internal)?;
    let mut m2 = c.modpow(&values.dq, q).into_bigint().ok_or(Error::Internal)?;
    let p = BigInt::from_biguint(num_bigint::Sign::Plus, p.clone());
    let q = BigInt::from_biguint(num_bigint::Sign::Plus, q.clone());

    // h = qinv * (m1 - m2) mod p, m = m2 + h * q
    m1 -= &m2;
    while m1.is_negative() {
        m1 += &p;
    }
    m1 *= &values.qinv;
    m1 %= &p;
    m1 *= &q;
    m1 += &m2;
    m2.zeroize();

    m1.into_biguint().ok_or(Error::Internal)
}

/// Returns `c * r^e mod n` for a random unit `r`, along with `r^-1 mod n`.
fn blind<R: CryptoRngCore>(
    rng: &mut R,
    n: &BigUint,
    e: &BigUint,
    c: &BigUint,
) -> (BigUint, BigUint) {
    let mut r: BigUint;
    let unblinder;
    loop {
        r = rng.gen_biguint_below(n);
        if r.is_zero() {
            r = BigUint::one();
        }
        if let Some(ir) = r.clone().mod_inverse(n).and_then(IntoBigUint::into_biguint) {
            unblinder = ir;
            break;
        }
    }

    let mut rpowe = r.modpow(e, n);
    let blinded = (c * &rpowe) % n;
    rpowe.zeroize();
    r.zeroize();

    (blinded, unblinder)
}
