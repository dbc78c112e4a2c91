//! FIPS key validation: SP 800-89 public key plausibility plus a pairwise
//! consistency test.

use std::sync::LazyLock;

use log::{debug, warn};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use sha2::{Digest, Sha256};

use crate::check::KeyShape;
use crate::errors::{Error, Result};
use crate::hash::DigestAlgorithm;
use crate::key::RsaKey;
use crate::prime::{checks_for_generation, enhanced_miller_rabin, PrimalityResult};

/// The first 132 odd primes, 3 through 751.
#[rustfmt::skip]
const SMALL_ODD_PRIMES: [u16; 132] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41,
    43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157,
    163, 167, 173, 179, 181, 191, 193, 197, 199, 211, 223, 227,
    229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317, 331, 337, 347, 349, 353, 359, 367,
    373, 379, 383, 389, 397, 401, 409, 419, 421, 431, 433, 439,
    443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509,
    521, 523, 541, 547, 557, 563, 569, 571, 577, 587, 593, 599,
    601, 607, 613, 617, 619, 631, 641, 643, 647, 653, 659, 661,
    673, 677, 683, 691, 701, 709, 719, 727, 733, 739, 743, 751,
];

static SMALL_FACTORS: LazyLock<BigUint> = LazyLock::new(|| {
    SMALL_ODD_PRIMES
        .iter()
        .fold(BigUint::one(), |acc, &p| acc * u32::from(p))
});

/// Message signed by the pairwise consistency test.
const PWCT_MESSAGE: [u8; 1] = [0];

impl RsaKey {
    /// Validates the key as FIPS 186-4 requires before use.
    ///
    /// Runs [`RsaKey::check_key`], then the partial public key validation of
    /// SP 800-89 § 5.3.3: `e` between 17 and 256 bits, `n` and `e` odd, `n`
    /// free of small factors, and `n` neither prime nor a prime power. For
    /// keys with a private exponent a signature over a fixed message is then
    /// produced and verified.
    ///
    /// Stripped keys are rejected with [`Error::BadKeyShape`].
    pub fn check_fips(&self) -> Result<()> {
        let shape = self.shape();
        if matches!(shape, KeyShape::Invalid | KeyShape::PrivateStripped) {
            debug!("check_fips: key shape {shape:?} cannot be validated");
            return Err(Error::BadKeyShape);
        }

        self.check_key()?;

        let (Some(n), Some(e)) = (self.n(), self.e()) else {
            return Err(Error::Internal);
        };
        if let Err(reason) = public_key_plausible(n, e) {
            warn!("check_fips: public key validation failed: {reason}");
            return Err(Error::PublicKeyValidationFailed);
        }

        if !shape.is_private() {
            return Ok(());
        }

        self.pairwise_consistency_test().map_err(|err| {
            warn!("check_fips: pairwise consistency test failed: {err}");
            Error::PublicKeyValidationFailed
        })
    }

    fn pairwise_consistency_test(&self) -> Result<()> {
        let sig = self.digest_sign(DigestAlgorithm::Sha256, &PWCT_MESSAGE)?;
        self.digest_verify(DigestAlgorithm::Sha256, &PWCT_MESSAGE, &sig)
    }
}

fn public_key_plausible(n: &BigUint, e: &BigUint) -> core::result::Result<(), &'static str> {
    if e.bits() <= 16 || e.bits() > 256 {
        return Err("public exponent size");
    }
    if n.is_even() || e.is_even() {
        return Err("even modulus or exponent");
    }
    if !n.gcd(&SMALL_FACTORS).is_one() {
        return Err("modulus has a small factor");
    }

    // Seeded from the modulus so a given key always gets the same verdict.
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&Sha256::digest(n.to_bytes_be()));
    let mut rng = ChaCha8Rng::from_seed(seed);

    match enhanced_miller_rabin(n, checks_for_generation(n.bits()), &mut rng) {
        Ok(PrimalityResult::NonPrimePowerComposite) => Ok(()),
        Ok(_) => Err("modulus is prime or a prime power"),
        Err(_) => Err("modulus too small for primality test"),
    }
}
