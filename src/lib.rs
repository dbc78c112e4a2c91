#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo_small.png")]
#![warn(missing_docs)]

//! # Usage
//!
//! ## Validating keys
//!
//! ```
//! use rsa_core::{BigUint, KeyShape, RsaKey};
//!
//! let n = BigUint::parse_bytes(b"d0941e63a980fa92fb25ed4c7b3307f827023034ae7f1a7491f0699ca7607285e62ad8e994bac21b8b6e305e334f4874067d28e304230dca7f0e85f7ce595770b6e054c9f844ba86c0696eeba0769d8d4a347e8fe85c724ac1c44994af18a39e719f721f1bc50c46a39e6c075fcd1649f01f22608ce7dc6955502258336987d9", 16).unwrap();
//! let e = BigUint::from(65537u32);
//!
//! let key = RsaKey::new_public(&n, &e).expect("valid public key");
//! assert_eq!(key.shape(), KeyShape::Public);
//! key.check_fips().expect("plausible public key");
//! ```
//!
//! ## PKCS#1 v1.5 signatures
//!
//! ```
//! use std::sync::Arc;
//! use rsa_core::{BigUint, DigestAlgorithm, RsaKey};
//! use rsa_core::pkcs1v15::SigningKey;
//! use rsa_core::signature::{Keypair, Signer, Verifier};
//!
//! # let hex = |s: &str| BigUint::parse_bytes(s.as_bytes(), 16).unwrap();
//! # let n = hex("d0941e63a980fa92fb25ed4c7b3307f827023034ae7f1a7491f0699ca7607285e62ad8e994bac21b8b6e305e334f4874067d28e304230dca7f0e85f7ce595770b6e054c9f844ba86c0696eeba0769d8d4a347e8fe85c724ac1c44994af18a39e719f721f1bc50c46a39e6c075fcd1649f01f22608ce7dc6955502258336987d9");
//! # let d = hex("5ff4a47e690ea338573e3d8b3fea5c32378ff4296855a51017cba86a9f3de9b1dc0fbe36c76b9bbd1c4a170a5f448c2a8489b3f3ac858be4aacb3daaa14dccc183622eedd3ae6f0427a2a298b51b97818a5430f13705f42d8b25476f939c935e389e30d9ade5d0180920135f5aef0c5fecd15f00b83b51dab8ba930d88826801");
//! let key = RsaKey::new_private_no_crt(&n, &BigUint::from(65537u32), &d)?;
//!
//! let sig = key.digest_sign(DigestAlgorithm::Sha256, b"hello world")?;
//! key.digest_verify(DigestAlgorithm::Sha256, b"hello world", &sig)?;
//!
//! let signing_key = SigningKey::new(Arc::new(key), DigestAlgorithm::Sha256);
//! let signature = signing_key.sign(b"hello world");
//! signing_key.verifying_key().verify(b"hello world", &signature)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[macro_use]
extern crate alloc;

pub use num_bigint::BigUint;
pub use signature;

mod algorithms;
pub mod errors;
pub mod hash;
pub mod method;
pub mod pkcs1v15;
pub mod prime;
pub mod pss;

mod check;
mod fips;
mod key;
mod padding;
mod raw;

pub use crate::{
    check::{check_public_component, KeyShape, MAX_MODULUS_BITS, MAX_PUBLIC_EXPONENT_BITS},
    errors::{Error, Result},
    hash::DigestAlgorithm,
    key::{KeyFlags, RsaKey},
    method::{Capabilities, RsaMethod},
    padding::Padding,
    pss::SaltLength,
    self_test::self_test,
};
