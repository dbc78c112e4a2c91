use alloc::sync::Arc;
use core::fmt;
use std::sync::Mutex;

use bitflags::bitflags;
use log::{debug, warn};
use num_bigint::{BigInt, BigUint, ModInverse, Sign};
use num_traits::One;
use zeroize::Zeroize;

use crate::check::KeyShape;
use crate::errors::{Error, Result};
use crate::method::{BoundMethod, Capabilities, RsaMethod};

bitflags! {
    /// Per-key behaviour flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyFlags: u32 {
        /// Private key material is held by the bound method and cannot be inspected.
        const OPAQUE = 0x01;
        /// Private operations run without blinding.
        const NO_BLINDING = 0x08;
        /// The key intentionally has no public exponent.
        const NO_PUBLIC_EXPONENT = 0x40;
        /// Public exponents wider than 33 bits are accepted, as long as they stay below `n`.
        const LARGE_PUBLIC_EXPONENT = 0x80;
    }
}

/// An RSA key: a public key `(n, e)`, optionally extended with the private
/// exponent, the two prime factors and the CRT values.
///
/// Every component is optional so that partially populated keys can be
/// represented; [`RsaKey::check_key`] and [`RsaKey::shape`] decide which
/// combinations are usable. Components are wiped when replaced or dropped.
///
/// Keys are shared between holders as `Arc<RsaKey>`. When the last reference
/// goes away the bound method's `finish` hook runs, then the key is wiped.
pub struct RsaKey {
    n: Option<BigUint>,
    e: Option<BigUint>,
    d: Option<BigUint>,
    p: Option<BigUint>,
    q: Option<BigUint>,
    dmp1: Option<BigUint>,
    dmq1: Option<BigUint>,
    iqmp: Option<BigUint>,
    flags: KeyFlags,
    method: BoundMethod,
    precomputed: Mutex<Option<Arc<Precomputed>>>,
}

/// CRT values derived lazily for the default private-key operation.
pub(crate) struct Precomputed {
    pub(crate) dp: BigUint,
    pub(crate) dq: BigUint,
    pub(crate) qinv: BigInt,
}

impl Precomputed {
    fn derive(key: &RsaKey) -> Result<Option<Self>> {
        let (Some(d), Some(p), Some(q)) = (key.d(), key.p(), key.q()) else {
            return Ok(None);
        };
        let one = BigUint::one();
        if p <= &one || q <= &one {
            return Ok(None);
        }

        let dp = match key.dmp1() {
            Some(dmp1) => dmp1.clone(),
            None => d % (p - &one),
        };
        let dq = match key.dmq1() {
            Some(dmq1) => dmq1.clone(),
            None => d % (q - &one),
        };
        let qinv = match key.iqmp() {
            Some(iqmp) => BigInt::from_biguint(Sign::Plus, iqmp.clone()),
            None => q.clone().mod_inverse(p).ok_or(Error::Internal)?,
        };

        Ok(Some(Precomputed { dp, dq, qinv }))
    }
}

impl Zeroize for Precomputed {
    fn zeroize(&mut self) {
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

impl Drop for Precomputed {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Default for RsaKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RsaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKey")
            .field("n", &self.n)
            .field("e", &self.e)
            .field("shape", &self.shape())
            .field("flags", &self.flags)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

impl RsaKey {
    /// Creates an empty key bound to the built-in implementation.
    pub fn new() -> Self {
        Self {
            n: None,
            e: None,
            d: None,
            p: None,
            q: None,
            dmp1: None,
            dmq1: None,
            iqmp: None,
            flags: KeyFlags::empty(),
            method: BoundMethod::Default,
            precomputed: Mutex::new(None),
        }
    }

    /// Creates an empty key bound to `method`.
    ///
    /// The method's `init` hook runs once it is bound, so the hook sees its
    /// own method on the key. If the hook fails the key is discarded without
    /// running `finish`.
    pub fn with_method(method: Arc<dyn RsaMethod>) -> Result<Self> {
        let mut key = Self::new();
        key.method = BoundMethod::bind(method);
        key.flags = key.method.flags();

        let init = match key.method_override(Capabilities::INIT) {
            Some(method) => method.init(&key),
            None => Ok(()),
        };
        if let Err(err) = init {
            warn!("rsa method init hook failed: {err}");
            key.method = BoundMethod::Default;
            return Err(err);
        }
        Ok(key)
    }

    /// Creates a key bound to `method` holding only the modulus, for
    /// providers that never expose the public exponent.
    pub fn with_method_no_e(method: Arc<dyn RsaMethod>, n: &BigUint) -> Result<Self> {
        let mut key = Self::with_method(method)?;
        key.n = Some(n.clone());
        key.flags |= KeyFlags::NO_PUBLIC_EXPONENT;
        Ok(key)
    }

    /// Creates a validated public key `(n, e)`.
    pub fn new_public(n: &BigUint, e: &BigUint) -> Result<Self> {
        let mut key = Self::new();
        key.n = Some(n.clone());
        key.e = Some(e.clone());
        key.checked()
    }

    /// Creates a validated private key with CRT values.
    #[allow(clippy::too_many_arguments)]
    pub fn new_private(
        n: &BigUint,
        e: &BigUint,
        d: &BigUint,
        p: &BigUint,
        q: &BigUint,
        dmp1: &BigUint,
        dmq1: &BigUint,
        iqmp: &BigUint,
    ) -> Result<Self> {
        Self::private_with_flags(KeyFlags::empty(), n, e, d, p, q, dmp1, dmq1, iqmp)
    }

    /// Creates a validated private key `(n, e, d)` without factors.
    pub fn new_private_no_crt(n: &BigUint, e: &BigUint, d: &BigUint) -> Result<Self> {
        let mut key = Self::new();
        key.n = Some(n.clone());
        key.e = Some(e.clone());
        key.d = Some(d.clone());
        key.checked()
    }

    /// Creates a validated stripped private key `(n, d)`.
    pub fn new_private_no_e(n: &BigUint, d: &BigUint) -> Result<Self> {
        let mut key = Self::new();
        key.flags = KeyFlags::NO_PUBLIC_EXPONENT;
        key.n = Some(n.clone());
        key.d = Some(d.clone());
        key.checked()
    }

    /// Like [`RsaKey::new_public`] but accepts any odd `e` below `n`.
    pub fn new_public_large_e(n: &BigUint, e: &BigUint) -> Result<Self> {
        let mut key = Self::new();
        key.flags = KeyFlags::LARGE_PUBLIC_EXPONENT;
        key.n = Some(n.clone());
        key.e = Some(e.clone());
        key.checked()
    }

    /// Like [`RsaKey::new_private`] but accepts any odd `e` below `n`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_private_large_e(
        n: &BigUint,
        e: &BigUint,
        d: &BigUint,
        p: &BigUint,
        q: &BigUint,
        dmp1: &BigUint,
        dmq1: &BigUint,
        iqmp: &BigUint,
    ) -> Result<Self> {
        Self::private_with_flags(
            KeyFlags::LARGE_PUBLIC_EXPONENT,
            n,
            e,
            d,
            p,
            q,
            dmp1,
            dmq1,
            iqmp,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn private_with_flags(
        flags: KeyFlags,
        n: &BigUint,
        e: &BigUint,
        d: &BigUint,
        p: &BigUint,
        q: &BigUint,
        dmp1: &BigUint,
        dmq1: &BigUint,
        iqmp: &BigUint,
    ) -> Result<Self> {
        let mut key = Self::new();
        key.flags = flags;
        key.n = Some(n.clone());
        key.e = Some(e.clone());
        key.d = Some(d.clone());
        key.p = Some(p.clone());
        key.q = Some(q.clone());
        key.dmp1 = Some(dmp1.clone());
        key.dmq1 = Some(dmq1.clone());
        key.iqmp = Some(iqmp.clone());
        key.checked()
    }

    fn checked(self) -> Result<Self> {
        self.check_key()?;
        Ok(self)
    }

    /// Returns the modulus.
    pub fn n(&self) -> Option<&BigUint> {
        self.n.as_ref()
    }

    /// Returns the public exponent.
    pub fn e(&self) -> Option<&BigUint> {
        self.e.as_ref()
    }

    /// Returns the private exponent.
    pub fn d(&self) -> Option<&BigUint> {
        self.d.as_ref()
    }

    /// Returns the first prime factor.
    pub fn p(&self) -> Option<&BigUint> {
        self.p.as_ref()
    }

    /// Returns the second prime factor.
    pub fn q(&self) -> Option<&BigUint> {
        self.q.as_ref()
    }

    /// Returns `d mod (p - 1)`.
    pub fn dmp1(&self) -> Option<&BigUint> {
        self.dmp1.as_ref()
    }

    /// Returns `d mod (q - 1)`.
    pub fn dmq1(&self) -> Option<&BigUint> {
        self.dmq1.as_ref()
    }

    /// Returns `q^-1 mod p`.
    pub fn iqmp(&self) -> Option<&BigUint> {
        self.iqmp.as_ref()
    }

    /// Returns `(n, e, d)`.
    pub fn key(&self) -> (Option<&BigUint>, Option<&BigUint>, Option<&BigUint>) {
        (self.n(), self.e(), self.d())
    }

    /// Returns `(p, q)`.
    pub fn factors(&self) -> (Option<&BigUint>, Option<&BigUint>) {
        (self.p(), self.q())
    }

    /// Returns `(dmp1, dmq1, iqmp)`.
    pub fn crt_params(&self) -> (Option<&BigUint>, Option<&BigUint>, Option<&BigUint>) {
        (self.dmp1(), self.dmq1(), self.iqmp())
    }

    /// Replaces `n`, `e` and `d`; `None` leaves a component unchanged.
    ///
    /// Fails without modifying the key if `n` would remain absent, or if both
    /// `e` and `d` would remain absent.
    pub fn set_key(
        &mut self,
        n: Option<BigUint>,
        e: Option<BigUint>,
        d: Option<BigUint>,
    ) -> Result<()> {
        if (self.n.is_none() && n.is_none())
            || (self.e.is_none() && e.is_none() && self.d.is_none() && d.is_none())
        {
            debug!("set_key: modulus or exponent would remain missing");
            wipe([n, e, d]);
            return Err(Error::MissingValue);
        }

        replace(&mut self.n, n);
        replace(&mut self.e, e);
        replace(&mut self.d, d);
        self.invalidate();
        Ok(())
    }

    /// Replaces the prime factors; `None` leaves a factor unchanged.
    ///
    /// Fails without modifying the key if either factor would remain absent.
    pub fn set_factors(&mut self, p: Option<BigUint>, q: Option<BigUint>) -> Result<()> {
        if (self.p.is_none() && p.is_none()) || (self.q.is_none() && q.is_none()) {
            debug!("set_factors: a prime factor would remain missing");
            wipe([p, q]);
            return Err(Error::MissingValue);
        }

        replace(&mut self.p, p);
        replace(&mut self.q, q);
        self.invalidate();
        Ok(())
    }

    /// Replaces the CRT values; `None` leaves a value unchanged.
    ///
    /// Fails without modifying the key if any of them would remain absent.
    pub fn set_crt_params(
        &mut self,
        dmp1: Option<BigUint>,
        dmq1: Option<BigUint>,
        iqmp: Option<BigUint>,
    ) -> Result<()> {
        if (self.dmp1.is_none() && dmp1.is_none())
            || (self.dmq1.is_none() && dmq1.is_none())
            || (self.iqmp.is_none() && iqmp.is_none())
        {
            debug!("set_crt_params: a CRT value would remain missing");
            wipe([dmp1, dmq1, iqmp]);
            return Err(Error::MissingValue);
        }

        replace(&mut self.dmp1, dmp1);
        replace(&mut self.dmq1, dmq1);
        replace(&mut self.iqmp, iqmp);
        self.invalidate();
        Ok(())
    }

    /// Bit length of the modulus, 0 when absent.
    pub fn bits(&self) -> usize {
        self.n.as_ref().map_or(0, BigUint::bits)
    }

    /// Output size in bytes of signatures and ciphertexts produced with this key.
    pub fn size(&self) -> usize {
        match self.method.overriding(Capabilities::SIZE) {
            Some(method) => method.size(self),
            None => self.bits().div_ceil(8),
        }
    }

    /// Classifies the key by which components are present.
    pub fn shape(&self) -> KeyShape {
        KeyShape::classify(self)
    }

    /// The key's flags.
    pub fn flags(&self) -> KeyFlags {
        self.flags
    }

    /// Adds `flags` to the key's flags.
    pub fn set_flags(&mut self, flags: KeyFlags) {
        self.flags |= flags;
    }

    /// Returns the subset of `mask` that is set on the key.
    pub fn test_flags(&self, mask: KeyFlags) -> KeyFlags {
        self.flags & mask
    }

    /// Whether the bound method keeps the private key out of reach.
    pub fn is_opaque(&self) -> bool {
        self.method.flags().contains(KeyFlags::OPAQUE)
    }

    /// Whether private operations are blinded.
    pub fn blinding_on(&self) -> bool {
        !self.flags.contains(KeyFlags::NO_BLINDING)
    }

    /// Sets [`KeyFlags::NO_BLINDING`].
    pub fn disable_blinding(&mut self) {
        self.flags |= KeyFlags::NO_BLINDING;
    }

    /// Rebinds the key to `method`. The `init` hook is not run.
    pub fn set_method(&mut self, method: Arc<dyn RsaMethod>) {
        self.method = BoundMethod::bind(method);
    }

    /// The method the key is bound to, `None` for the built-in implementation.
    pub fn method(&self) -> Option<&Arc<dyn RsaMethod>> {
        self.method.method()
    }

    pub(crate) fn method_override(&self, capability: Capabilities) -> Option<&dyn RsaMethod> {
        self.method.overriding(capability)
    }

    /// Returns the cached CRT values, deriving them on first use.
    pub(crate) fn precomputed(&self) -> Result<Option<Arc<Precomputed>>> {
        let mut cache = self.precomputed.lock().map_err(|_| Error::Internal)?;
        if let Some(values) = cache.as_ref() {
            return Ok(Some(Arc::clone(values)));
        }

        let values = match Precomputed::derive(self)? {
            Some(values) => Arc::new(values),
            None => return Ok(None),
        };
        *cache = Some(Arc::clone(&values));
        Ok(Some(values))
    }

    fn invalidate(&mut self) {
        self.precomputed = Mutex::new(None);
    }
}

impl Drop for RsaKey {
    fn drop(&mut self) {
        if let Some(method) = self.method.overriding(Capabilities::FINISH) {
            method.finish(self);
        }

        self.n.zeroize();
        self.e.zeroize();
        self.d.zeroize();
        self.p.zeroize();
        self.q.zeroize();
        self.dmp1.zeroize();
        self.dmq1.zeroize();
        self.iqmp.zeroize();
    }
}

fn replace(slot: &mut Option<BigUint>, value: Option<BigUint>) {
    if let Some(value) = value {
        if let Some(old) = slot.as_mut() {
            old.zeroize();
        }
        *slot = Some(value);
    }
}

fn wipe<const N: usize>(values: [Option<BigUint>; N]) {
    for mut value in values.into_iter().flatten() {
        value.zeroize();
    }
}
