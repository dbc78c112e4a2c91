//! Primality testing for RSA modulus validation.
//!
//! Implements the enhanced Miller-Rabin test of FIPS 186-4 Appendix C.3.2,
//! which, unlike the plain test, distinguishes a composite with a known
//! factor from a composite that is not a prime power.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand_core::RngCore;

use crate::errors::{Error, Result};

/// Outcome of [`enhanced_miller_rabin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimalityResult {
    /// No witness to compositeness was found.
    ProbablyPrime,
    /// A base shares a factor with `w`, or a nontrivial square root of one
    /// exposed a factor.
    CompositeWithFactor,
    /// `w` is composite and not a power of a prime.
    NonPrimePowerComposite,
}

/// Number of Miller-Rabin rounds giving a 2^-80 error bound for a random
/// candidate of `bits` bits (FIPS 186-4 Table C.2, as used for generation).
pub fn checks_for_generation(bits: usize) -> usize {
    match bits {
        3747.. => 3,
        1345.. => 4,
        476.. => 5,
        400.. => 6,
        347.. => 7,
        308.. => 8,
        55.. => 27,
        _ => 34,
    }
}

/// Runs `iterations` rounds of the enhanced Miller-Rabin test on `w` with
/// bases drawn from `rng`.
///
/// `w` must be odd and greater than 3.
pub fn enhanced_miller_rabin<R: RngCore>(
    w: &BigUint,
    iterations: usize,
    rng: &mut R,
) -> Result<PrimalityResult> {
    let one = BigUint::one();
    let two = BigUint::from(2u8);
    if w.is_even() || w <= &BigUint::from(3u8) {
        return Err(Error::Internal);
    }

    // w - 1 = 2^a * m with m odd.
    let w_minus_one = w - &one;
    let mut m = w_minus_one.clone();
    let mut a = 0usize;
    while m.is_even() {
        m >>= 1;
        a += 1;
    }

    'rounds: for _ in 0..iterations {
        // b in [2, w - 2]
        let b = rng.gen_biguint_range(&two, &w_minus_one);

        if !b.gcd(w).is_one() {
            return Ok(PrimalityResult::CompositeWithFactor);
        }

        let mut z = b.modpow(&m, w);
        if z.is_one() || z == w_minus_one {
            continue;
        }

        // Square until -1 (inconclusive) or 1 (x is a nontrivial root).
        let mut root = None;
        for _ in 1..a {
            let x = z.clone();
            z = x.modpow(&two, w);
            if z == w_minus_one {
                continue 'rounds;
            }
            if z.is_one() {
                root = Some(x);
                break;
            }
        }

        let x = match root {
            Some(x) => x,
            None => {
                let squared = z.modpow(&two, w);
                if squared.is_one() {
                    z
                } else {
                    squared
                }
            }
        };

        if (&x - &one).gcd(w).is_one() {
            return Ok(PrimalityResult::NonPrimePowerComposite);
        }
        return Ok(PrimalityResult::CompositeWithFactor);
    }

    Ok(PrimalityResult::ProbablyPrime)
}
