//! Pluggable transform table a key can be bound to.
//!
//! A method advertises the operations it overrides through
//! [`RsaMethod::capabilities`]. The advertisement is read once when the method
//! is bound to a key; every operation it does not advertise runs the built-in
//! software implementation.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use bitflags::bitflags;
use log::trace;

use crate::errors::{Error, Result};
use crate::hash::DigestAlgorithm;
use crate::key::{KeyFlags, RsaKey};
use crate::padding::Padding;

bitflags! {
    /// Operations an [`RsaMethod`] overrides.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Overrides [`RsaMethod::init`].
        const INIT              = 1 << 0;
        /// Overrides [`RsaMethod::finish`].
        const FINISH            = 1 << 1;
        /// Overrides [`RsaMethod::size`].
        const SIZE              = 1 << 2;
        /// Overrides [`RsaMethod::sign_raw`].
        const SIGN_RAW          = 1 << 3;
        /// Overrides [`RsaMethod::verify_raw`].
        const VERIFY_RAW        = 1 << 4;
        /// Overrides [`RsaMethod::encrypt`].
        const ENCRYPT           = 1 << 5;
        /// Overrides [`RsaMethod::decrypt`].
        const DECRYPT           = 1 << 6;
        /// Overrides [`RsaMethod::sign`].
        const SIGN              = 1 << 7;
        /// Overrides [`RsaMethod::private_transform`].
        const PRIVATE_TRANSFORM = 1 << 8;
    }
}

/// A set of overridable RSA operations, typically backed by hardware or an
/// external provider.
///
/// The raw operations (`sign_raw`, `verify_raw`, `encrypt`, `decrypt`) keep
/// the legacy convention of returning the number of bytes written, or a
/// negative value on failure. Callers of [`RsaKey`] never see that convention;
/// it is translated into [`Result`] at the key boundary.
///
/// Only methods whose [`Capabilities`] bit is set are ever called.
pub trait RsaMethod: Send + Sync {
    /// Operations this method overrides.
    fn capabilities(&self) -> Capabilities;

    /// Flags the method imposes on keys bound to it. Only
    /// [`KeyFlags::OPAQUE`] is honoured.
    fn flags(&self) -> KeyFlags {
        KeyFlags::empty()
    }

    /// Called once when a key is created with this method, before the method
    /// is bound. A failure aborts key creation and `finish` is not run.
    fn init(&self, _key: &RsaKey) -> Result<()> {
        Ok(())
    }

    /// Called when the last reference to a bound key is released.
    fn finish(&self, _key: &RsaKey) {}

    /// Output size of the key in bytes.
    fn size(&self, key: &RsaKey) -> usize {
        key.bits().div_ceil(8)
    }

    /// Private-key operation over `input` into `out`.
    fn sign_raw(&self, _key: &RsaKey, _out: &mut [u8], _input: &[u8], _padding: Padding) -> isize {
        -1
    }

    /// Public-key operation recovering the payload of `sig` into `out`.
    fn verify_raw(&self, _key: &RsaKey, _out: &mut [u8], _sig: &[u8], _padding: Padding) -> isize {
        -1
    }

    /// Public-key encryption of `input` into `out`.
    fn encrypt(&self, _key: &RsaKey, _out: &mut [u8], _input: &[u8], _padding: Padding) -> isize {
        -1
    }

    /// Private-key decryption of `input` into `out`.
    fn decrypt(&self, _key: &RsaKey, _out: &mut [u8], _input: &[u8], _padding: Padding) -> isize {
        -1
    }

    /// PKCS#1 v1.5 signature over a digest whose length has already been
    /// checked against `algorithm`.
    fn sign(&self, _key: &RsaKey, _algorithm: DigestAlgorithm, _digest: &[u8]) -> Result<Vec<u8>> {
        Err(Error::Internal)
    }

    /// Raw private transform writing exactly `out.len()` bytes.
    fn private_transform(&self, _key: &RsaKey, _out: &mut [u8], _input: &[u8]) -> Result<()> {
        Err(Error::Internal)
    }
}

/// The transform table a key resolved at bind time.
#[derive(Clone, Default)]
pub(crate) enum BoundMethod {
    #[default]
    Default,
    Overridden {
        method: Arc<dyn RsaMethod>,
        capabilities: Capabilities,
        flags: KeyFlags,
    },
}

impl BoundMethod {
    pub(crate) fn bind(method: Arc<dyn RsaMethod>) -> Self {
        let capabilities = method.capabilities();
        let flags = method.flags() & KeyFlags::OPAQUE;
        BoundMethod::Overridden {
            method,
            capabilities,
            flags,
        }
    }

    /// Returns the method when it overrides `capability`.
    pub(crate) fn overriding(&self, capability: Capabilities) -> Option<&dyn RsaMethod> {
        match self {
            BoundMethod::Overridden {
                method,
                capabilities,
                ..
            } if capabilities.contains(capability) => {
                trace!("dispatching {capability:?} to bound method");
                Some(&**method)
            }
            _ => None,
        }
    }

    pub(crate) fn method(&self) -> Option<&Arc<dyn RsaMethod>> {
        match self {
            BoundMethod::Default => None,
            BoundMethod::Overridden { method, .. } => Some(method),
        }
    }

    pub(crate) fn flags(&self) -> KeyFlags {
        match self {
            BoundMethod::Default => KeyFlags::empty(),
            BoundMethod::Overridden { flags, .. } => *flags,
        }
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundMethod::Default => f.write_str("Default"),
            BoundMethod::Overridden {
                capabilities,
                flags,
                ..
            } => f
                .debug_struct("Overridden")
                .field("capabilities", capabilities)
                .field("flags", flags)
                .finish_non_exhaustive(),
        }
    }
}

/// Translates the legacy "length or negative" return of a raw override.
pub(crate) fn legacy_output_len(ret: isize, max_out: usize) -> Result<usize> {
    match usize::try_from(ret) {
        Ok(len) if len <= max_out => Ok(len),
        _ => Err(Error::Internal),
    }
}
