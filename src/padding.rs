//! Padding modes of the raw RSA operations.

use core::fmt;

/// Padding applied by [`RsaKey::sign_raw`](crate::RsaKey::sign_raw),
/// [`RsaKey::verify_raw`](crate::RsaKey::verify_raw),
/// [`RsaKey::encrypt`](crate::RsaKey::encrypt) and
/// [`RsaKey::decrypt`](crate::RsaKey::decrypt).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Padding {
    /// PKCS#1 v1.5: block type 1 for signatures, block type 2 for encryption.
    Pkcs1,

    /// No padding. Input must be exactly the key size.
    None,
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Padding::Pkcs1 => f.write_str("pkcs1"),
            Padding::None => f.write_str("none"),
        }
    }
}
