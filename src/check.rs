//! Key shape classification and key validation.

use alloc::vec::Vec;

use log::debug;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};
use crate::key::{KeyFlags, RsaKey};

/// Largest accepted modulus, in bits.
pub const MAX_MODULUS_BITS: usize = 16384;

/// Largest accepted public exponent, in bits, unless
/// [`KeyFlags::LARGE_PUBLIC_EXPONENT`] is set.
pub const MAX_PUBLIC_EXPONENT_BITS: usize = 33;

/// Which components of a key are present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyShape {
    /// `(n, e)`
    Public,
    /// `(n, e, d)`
    PrivateMinimal,
    /// `(n, e, d, p, q)`
    Private,
    /// `(n, e, d, p, q, dmp1, dmq1, iqmp)`
    PrivateCrt,
    /// `(n, d)` with no public exponent.
    PrivateStripped,
    /// Any other combination.
    Invalid,
}

impl KeyShape {
    /// Classifies `key` from the presence of its components alone.
    pub fn classify(key: &RsaKey) -> Self {
        if key.n().is_none() {
            return KeyShape::Invalid;
        }

        let (_, e, d) = key.key();
        let (p, q) = key.factors();
        let (dmp1, dmq1, iqmp) = key.crt_params();
        let crt = (dmp1.is_some(), dmq1.is_some(), iqmp.is_some());

        match (e.is_some(), d.is_some(), p.is_some(), q.is_some(), crt) {
            (true, false, false, false, (false, false, false)) => KeyShape::Public,
            (true, true, false, false, (false, false, false)) => KeyShape::PrivateMinimal,
            (true, true, true, true, (false, false, false)) => KeyShape::Private,
            (true, true, true, true, (true, true, true)) => KeyShape::PrivateCrt,
            (false, true, false, false, (false, false, false)) => KeyShape::PrivateStripped,
            _ => KeyShape::Invalid,
        }
    }

    /// Whether the key carries a private exponent.
    pub fn is_private(self) -> bool {
        !matches!(self, KeyShape::Public | KeyShape::Invalid)
    }
}

/// Validates the public half of `key`: modulus size and parity, and the
/// public exponent within the bounds selected by the key's flags.
pub fn check_public_component(key: &RsaKey) -> Result<()> {
    let Some(n) = key.n() else {
        debug!("public component check: modulus missing");
        return Err(Error::MissingValue);
    };

    if n.bits() > MAX_MODULUS_BITS {
        debug!("public component check: modulus of {} bits", n.bits());
        return Err(Error::ModulusTooLarge);
    }

    if n.is_even() {
        debug!("public component check: even modulus");
        return Err(Error::BadModulusParity);
    }

    let Some(e) = key.e() else {
        if key.test_flags(KeyFlags::NO_PUBLIC_EXPONENT).is_empty() {
            debug!("public component check: public exponent missing");
            return Err(Error::MissingValue);
        }
        return Ok(());
    };

    if e.is_even() || e.bits() < 2 {
        debug!("public component check: public exponent even or below 2 bits");
        return Err(Error::BadExponent);
    }

    if key.test_flags(KeyFlags::LARGE_PUBLIC_EXPONENT).is_empty() {
        if e.bits() > MAX_PUBLIC_EXPONENT_BITS {
            debug!("public component check: public exponent of {} bits", e.bits());
            return Err(Error::BadExponent);
        }
    } else if e >= n {
        debug!("public component check: public exponent not below modulus");
        return Err(Error::BadExponent);
    }

    Ok(())
}

impl RsaKey {
    /// Checks that the key is well formed and that its private components,
    /// if any, are consistent with the public ones.
    ///
    /// Public, minimal and stripped keys only get the public component
    /// check. Keys with factors additionally get:
    ///
    /// - `p < n` and `q < n`,
    /// - `p * q == n`,
    /// - `d * e == 1 mod (p - 1)` and `mod (q - 1)`,
    ///
    /// and keys with CRT values:
    ///
    /// - `dmp1 == d mod (p - 1)`, `dmq1 == d mod (q - 1)`,
    /// - `iqmp < p` and `q * iqmp == 1 mod p`.
    ///
    /// The factor bounds are checked before any multiplication so oversized
    /// inputs are rejected cheaply.
    pub fn check_key(&self) -> Result<()> {
        let shape = self.shape();
        if shape == KeyShape::Invalid {
            debug!("check_key: unrecognised combination of components");
            return Err(Error::BadKeyShape);
        }

        check_public_component(self)?;

        if !matches!(shape, KeyShape::Private | KeyShape::PrivateCrt) {
            return Ok(());
        }

        let (Some(n), Some(e), Some(d)) = self.key() else {
            return Err(Error::Internal);
        };
        let (Some(p), Some(q)) = self.factors() else {
            return Err(Error::Internal);
        };

        if p >= n || q >= n {
            debug!("check_key: prime factor not below modulus");
            return Err(Error::FactorOutOfRange);
        }

        if &(p * q) != n {
            debug!("check_key: n is not p * q");
            return Err(Error::FactorizationMismatch);
        }

        let one = BigUint::one();
        let pm1 = Zeroizing::new(p - &one);
        let qm1 = Zeroizing::new(q - &one);

        // Accepts d reduced modulo either the Euler or the Carmichael totient.
        let de = Zeroizing::new(d * e);
        let de_p = Zeroizing::new(&*de % &*pm1);
        let de_q = Zeroizing::new(&*de % &*qm1);
        if *de_p != one || *de_q != one {
            debug!("check_key: d * e is not an inverse modulo p - 1 and q - 1");
            return Err(Error::ExponentNotInverse);
        }

        if shape == KeyShape::Private {
            return Ok(());
        }

        let (Some(dmp1), Some(dmq1), Some(iqmp)) = self.crt_params() else {
            return Err(Error::Internal);
        };

        let width = self.bits().div_ceil(8);
        let expected_dmp1 = Zeroizing::new(d % &*pm1);
        let expected_dmq1 = Zeroizing::new(d % &*qm1);
        let dmp1_ok = ct_eq_uint(dmp1, &expected_dmp1, width);
        let dmq1_ok = ct_eq_uint(dmq1, &expected_dmq1, width);
        let iqmp_ok = iqmp < p && ((q * iqmp) % p).is_one();

        if !(dmp1_ok && dmq1_ok && iqmp_ok) {
            debug!("check_key: crt values incorrect");
            return Err(Error::CrtValuesIncorrect);
        }

        Ok(())
    }
}

/// Compares two secret values over fixed-width encodings.
fn ct_eq_uint(a: &BigUint, b: &BigUint, width: usize) -> bool {
    let a = fixed_width(a, width);
    let b = fixed_width(b, width);
    a.len() == b.len() && bool::from(a.ct_eq(&b))
}

fn fixed_width(value: &BigUint, width: usize) -> Zeroizing<Vec<u8>> {
    let bytes = Zeroizing::new(value.to_bytes_be());
    let mut out = Zeroizing::new(vec![0u8; width.max(bytes.len())]);
    let offset = out.len() - bytes.len();
    out[offset..].copy_from_slice(&bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    fn key_with(components: [Option<u64>; 8], flags: KeyFlags) -> RsaKey {
        let [n, e, d, p, q, dmp1, dmq1, iqmp] = components.map(|c| c.map(big));
        let mut key = RsaKey::new();
        key.set_flags(flags);
        if n.is_some() && (e.is_some() || d.is_some()) {
            key.set_key(n, e, d).unwrap();
        }
        if p.is_some() && q.is_some() {
            key.set_factors(p, q).unwrap();
        }
        if dmp1.is_some() && dmq1.is_some() && iqmp.is_some() {
            key.set_crt_params(dmp1, dmq1, iqmp).unwrap();
        }
        key
    }

    const TOY: [Option<u64>; 8] = [
        Some(3233),
        Some(17),
        Some(2753),
        Some(61),
        Some(53),
        Some(53),
        Some(49),
        Some(38),
    ];

    #[test]
    fn test_classify() {
        let shape = |mask: [bool; 8]| {
            let mut components = TOY;
            for (c, keep) in components.iter_mut().zip(mask) {
                if !keep {
                    *c = None;
                }
            }
            key_with(components, KeyFlags::empty()).shape()
        };

        let t = true;
        let f = false;
        assert_eq!(shape([t, t, f, f, f, f, f, f]), KeyShape::Public);
        assert_eq!(shape([t, t, t, f, f, f, f, f]), KeyShape::PrivateMinimal);
        assert_eq!(shape([t, t, t, t, t, f, f, f]), KeyShape::Private);
        assert_eq!(shape([t, t, t, t, t, t, t, t]), KeyShape::PrivateCrt);
        assert_eq!(shape([t, f, t, f, f, f, f, f]), KeyShape::PrivateStripped);
        assert_eq!(shape([t, f, t, t, t, f, f, f]), KeyShape::Invalid);
        assert_eq!(shape([t, t, f, t, t, f, f, f]), KeyShape::Invalid);
        assert_eq!(shape([f, f, f, f, f, f, f, f]), KeyShape::Invalid);
        assert_eq!(RsaKey::new().shape(), KeyShape::Invalid);
    }

    #[test]
    fn test_crt_without_factors_is_invalid() {
        let mut key = key_with(TOY, KeyFlags::empty());
        assert_eq!(key.check_key(), Ok(()));

        let mut partial = RsaKey::new();
        partial
            .set_key(Some(big(3233)), Some(big(17)), Some(big(2753)))
            .unwrap();
        partial
            .set_crt_params(Some(big(53)), Some(big(49)), Some(big(38)))
            .unwrap();
        assert_eq!(partial.shape(), KeyShape::Invalid);
        assert_eq!(partial.check_key(), Err(Error::BadKeyShape));

        key.set_crt_params(Some(big(54)), None, None).unwrap();
        assert_eq!(key.check_key(), Err(Error::CrtValuesIncorrect));
    }

    #[test]
    fn test_public_component_checks_in_order() {
        let public = |n, e, flags| {
            key_with([Some(n), e, None, None, None, None, None, None], flags)
        };

        assert_eq!(
            check_public_component(&RsaKey::new()),
            Err(Error::MissingValue)
        );
        assert_eq!(
            check_public_component(&public(3234, Some(17), KeyFlags::empty())),
            Err(Error::BadModulusParity)
        );
        assert_eq!(
            check_public_component(&public(3233, Some(16), KeyFlags::empty())),
            Err(Error::BadExponent)
        );
        assert_eq!(
            check_public_component(&public(3233, Some(1), KeyFlags::empty())),
            Err(Error::BadExponent)
        );
        assert_eq!(
            check_public_component(&public(3233, Some(3), KeyFlags::empty())),
            Ok(())
        );
    }

    #[test]
    fn test_exponent_bounds() {
        let n = (BigUint::one() << 64) + 1u32;
        let wide_e = (BigUint::one() << 33) + 1u32;
        let mut key = RsaKey::new();
        key.set_key(Some(n.clone()), Some(wide_e.clone()), None)
            .unwrap();
        assert_eq!(check_public_component(&key), Err(Error::BadExponent));

        key.set_flags(KeyFlags::LARGE_PUBLIC_EXPONENT);
        assert_eq!(check_public_component(&key), Ok(()));

        key.set_key(None, Some(n + 2u32), None).unwrap();
        assert_eq!(check_public_component(&key), Err(Error::BadExponent));

        // 33 bits is still within the default bound.
        let mut key = RsaKey::new();
        key.set_key(Some(big(u64::MAX)), Some(wide_e - 2u32), None)
            .unwrap();
        assert_eq!(check_public_component(&key), Ok(()));
    }

    #[test]
    fn test_stripped_key_needs_flag() {
        let stripped = [Some(3233), None, Some(2753), None, None, None, None, None];
        let key = key_with(stripped, KeyFlags::empty());
        assert_eq!(key.check_key(), Err(Error::MissingValue));

        let key = key_with(stripped, KeyFlags::NO_PUBLIC_EXPONENT);
        assert_eq!(key.check_key(), Ok(()));
    }

    #[test]
    fn test_consistency_failures() {
        let mut bad_factor = TOY;
        bad_factor[3] = Some(3299);
        assert_eq!(
            key_with(bad_factor, KeyFlags::empty()).check_key(),
            Err(Error::FactorOutOfRange)
        );

        let mut bad_product = TOY;
        bad_product[3] = Some(59);
        assert_eq!(
            key_with(bad_product, KeyFlags::empty()).check_key(),
            Err(Error::FactorizationMismatch)
        );

        let mut bad_d = TOY;
        bad_d[2] = Some(2755);
        assert_eq!(
            key_with(bad_d, KeyFlags::empty()).check_key(),
            Err(Error::ExponentNotInverse)
        );

        let mut bad_iqmp = TOY;
        bad_iqmp[7] = Some(38 + 61);
        assert_eq!(
            key_with(bad_iqmp, KeyFlags::empty()).check_key(),
            Err(Error::CrtValuesIncorrect)
        );
    }

    #[test]
    fn test_euler_totient_exponent_accepted() {
        // d = e^-1 mod phi(n) = 2753 and mod lcm = 413 both pass.
        let mut carmichael = TOY;
        carmichael[2] = Some(413);
        carmichael[5] = Some(413 % 60);
        carmichael[6] = Some(413 % 52);
        assert_eq!(key_with(carmichael, KeyFlags::empty()).check_key(), Ok(()));
        assert_eq!(key_with(TOY, KeyFlags::empty()).check_key(), Ok(()));
    }
}
