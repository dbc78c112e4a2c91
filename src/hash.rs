//! Digest algorithms usable with PKCS#1 v1.5 and PSS signatures.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use const_oid::ObjectIdentifier;
use digest::{Digest, DynDigest};

use crate::errors::{Error, Result};

/// Length of the concatenated MD5 and SHA-1 digests used by pre-1.2 TLS.
pub const MD5_SHA1_LENGTH: usize = 36;

/// A digest algorithm a signature can be computed over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// MD5.
    Md5,
    /// SHA-1.
    Sha1,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// SHA-512/224.
    Sha512_224,
    /// SHA-512/256.
    Sha512_256,
    /// SHA3-224.
    Sha3_224,
    /// SHA3-256.
    Sha3_256,
    /// SHA3-384.
    Sha3_384,
    /// SHA3-512.
    Sha3_512,
    /// MD5 and SHA-1 digests concatenated, signed without a DigestInfo prefix.
    Md5Sha1,
}

impl DigestAlgorithm {
    /// Every supported algorithm.
    pub const ALL: [DigestAlgorithm; 13] = [
        DigestAlgorithm::Md5,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha224,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Sha512_224,
        DigestAlgorithm::Sha512_256,
        DigestAlgorithm::Sha3_224,
        DigestAlgorithm::Sha3_256,
        DigestAlgorithm::Sha3_384,
        DigestAlgorithm::Sha3_512,
        DigestAlgorithm::Md5Sha1,
    ];

    /// Returns the length in bytes of a digest.
    pub const fn output_size(self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 16,
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha224 | DigestAlgorithm::Sha512_224 | DigestAlgorithm::Sha3_224 => {
                28
            }
            DigestAlgorithm::Sha256 | DigestAlgorithm::Sha512_256 | DigestAlgorithm::Sha3_256 => {
                32
            }
            DigestAlgorithm::Sha384 | DigestAlgorithm::Sha3_384 => 48,
            DigestAlgorithm::Sha512 | DigestAlgorithm::Sha3_512 => 64,
            DigestAlgorithm::Md5Sha1 => MD5_SHA1_LENGTH,
        }
    }

    /// Object identifier of the algorithm. `Md5Sha1` has none.
    pub fn oid(self) -> Option<ObjectIdentifier> {
        let oid = match self {
            DigestAlgorithm::Md5 => OID_MD5,
            DigestAlgorithm::Sha1 => OID_SHA1,
            DigestAlgorithm::Sha224 => OID_SHA224,
            DigestAlgorithm::Sha256 => OID_SHA256,
            DigestAlgorithm::Sha384 => OID_SHA384,
            DigestAlgorithm::Sha512 => OID_SHA512,
            DigestAlgorithm::Sha512_224 => OID_SHA512_224,
            DigestAlgorithm::Sha512_256 => OID_SHA512_256,
            DigestAlgorithm::Sha3_224 => OID_SHA3_224,
            DigestAlgorithm::Sha3_256 => OID_SHA3_256,
            DigestAlgorithm::Sha3_384 => OID_SHA3_384,
            DigestAlgorithm::Sha3_512 => OID_SHA3_512,
            DigestAlgorithm::Md5Sha1 => return None,
        };
        Some(oid)
    }

    /// Looks up the algorithm identified by `oid`.
    pub fn from_oid(oid: ObjectIdentifier) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.oid() == Some(oid))
            .ok_or(Error::UnknownDigestAlgorithm)
    }

    /// The DER encoded DigestInfo prefix placed before the digest (RFC 8017 § 9.2).
    ///
    /// Returns `None` for [`DigestAlgorithm::Md5Sha1`], which is signed bare.
    pub fn pkcs1_prefix(self) -> Option<&'static [u8]> {
        PKCS1_PREFIXES
            .iter()
            .find(|(alg, _)| *alg == self)
            .map(|(_, prefix)| *prefix)
    }

    /// Hashes `msg`.
    pub fn digest(self, msg: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Md5 => md5::Md5::digest(msg).to_vec(),
            DigestAlgorithm::Sha1 => sha1::Sha1::digest(msg).to_vec(),
            DigestAlgorithm::Sha224 => sha2::Sha224::digest(msg).to_vec(),
            DigestAlgorithm::Sha256 => sha2::Sha256::digest(msg).to_vec(),
            DigestAlgorithm::Sha384 => sha2::Sha384::digest(msg).to_vec(),
            DigestAlgorithm::Sha512 => sha2::Sha512::digest(msg).to_vec(),
            DigestAlgorithm::Sha512_224 => sha2::Sha512_224::digest(msg).to_vec(),
            DigestAlgorithm::Sha512_256 => sha2::Sha512_256::digest(msg).to_vec(),
            DigestAlgorithm::Sha3_224 => sha3::Sha3_224::digest(msg).to_vec(),
            DigestAlgorithm::Sha3_256 => sha3::Sha3_256::digest(msg).to_vec(),
            DigestAlgorithm::Sha3_384 => sha3::Sha3_384::digest(msg).to_vec(),
            DigestAlgorithm::Sha3_512 => sha3::Sha3_512::digest(msg).to_vec(),
            DigestAlgorithm::Md5Sha1 => {
                let mut out = Vec::with_capacity(MD5_SHA1_LENGTH);
                out.extend_from_slice(&md5::Md5::digest(msg));
                out.extend_from_slice(&sha1::Sha1::digest(msg));
                out
            }
        }
    }

    /// Returns a fresh hasher for use by PSS and MGF1.
    pub(crate) fn hasher(self) -> Result<Box<dyn DynDigest>> {
        let hasher: Box<dyn DynDigest> = match self {
            DigestAlgorithm::Md5 => Box::new(md5::Md5::new()),
            DigestAlgorithm::Sha1 => Box::new(sha1::Sha1::new()),
            DigestAlgorithm::Sha224 => Box::new(sha2::Sha224::new()),
            DigestAlgorithm::Sha256 => Box::new(sha2::Sha256::new()),
            DigestAlgorithm::Sha384 => Box::new(sha2::Sha384::new()),
            DigestAlgorithm::Sha512 => Box::new(sha2::Sha512::new()),
            DigestAlgorithm::Sha512_224 => Box::new(sha2::Sha512_224::new()),
            DigestAlgorithm::Sha512_256 => Box::new(sha2::Sha512_256::new()),
            DigestAlgorithm::Sha3_224 => Box::new(sha3::Sha3_224::new()),
            DigestAlgorithm::Sha3_256 => Box::new(sha3::Sha3_256::new()),
            DigestAlgorithm::Sha3_384 => Box::new(sha3::Sha3_384::new()),
            DigestAlgorithm::Sha3_512 => Box::new(sha3::Sha3_512::new()),
            DigestAlgorithm::Md5Sha1 => return Err(Error::UnknownDigestAlgorithm),
        };
        Ok(hasher)
    }

    fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha224 => "sha224",
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
            DigestAlgorithm::Sha512_224 => "sha512-224",
            DigestAlgorithm::Sha512_256 => "sha512-256",
            DigestAlgorithm::Sha3_224 => "sha3-224",
            DigestAlgorithm::Sha3_256 => "sha3-256",
            DigestAlgorithm::Sha3_384 => "sha3-384",
            DigestAlgorithm::Sha3_512 => "sha3-512",
            DigestAlgorithm::Md5Sha1 => "md5-sha1",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.to_ascii_lowercase();
        let s = match s.as_str() {
            "sha-1" => "sha1",
            "sha-224" => "sha224",
            "sha-256" => "sha256",
            "sha-384" => "sha384",
            "sha-512" => "sha512",
            "sha-512/224" | "sha512/224" => "sha512-224",
            "sha-512/256" | "sha512/256" => "sha512-256",
            "md5sha1" => "md5-sha1",
            other => other,
        };
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.name() == s)
            .ok_or(Error::UnknownDigestAlgorithm)
    }
}

const OID_MD5: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.2.5");
const OID_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.14.3.2.26");
const OID_SHA256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.1");
const OID_SHA384: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.2");
const OID_SHA512: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.3");
const OID_SHA224: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.4");
const OID_SHA512_224: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.5");
const OID_SHA512_256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.6");
const OID_SHA3_224: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.7");
const OID_SHA3_256: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.8");
const OID_SHA3_384: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.9");
const OID_SHA3_512: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.2.10");

/// prefix = 0x30 <oid_len + 8 + digest_len> 0x30 <oid_len + 4> 0x06 <oid_len> oid 0x05 0x00 0x04 <digest_len>
#[rustfmt::skip]
static PKCS1_PREFIXES: [(DigestAlgorithm, &[u8]); 12] = [
    (DigestAlgorithm::Md5, &[
        0x30, 0x20, 0x30, 0x0c, 0x06, 0x08, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x02, 0x05,
        0x05, 0x00, 0x04, 0x10,
    ]),
    (DigestAlgorithm::Sha1, &[
        0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00, 0x04,
        0x14,
    ]),
    (DigestAlgorithm::Sha224, &[
        0x30, 0x2d, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
        0x04, 0x05, 0x00, 0x04, 0x1c,
    ]),
    (DigestAlgorithm::Sha256, &[
        0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
        0x01, 0x05, 0x00, 0x04, 0x20,
    ]),
    (DigestAlgorithm::Sha384, &[
        0x30, 0x41, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
        0x02, 0x05, 0x00, 0x04, 0x30,
    ]),
    (DigestAlgorithm::Sha512, &[
        0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
        0x03, 0x05, 0x00, 0x04, 0x40,
    ]),
    (DigestAlgorithm::Sha512_224, &[
        0x30, 0x2d, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
        0x05, 0x05, 0x00, 0x04, 0x1c,
    ]),
    (DigestAlgorithm::Sha512_256, &[
        0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
        0x06, 0x05, 0x00, 0x04, 0x20,
    ]),
    (DigestAlgorithm::Sha3_224, &[
        0x30, 0x2d, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
        0x07, 0x05, 0x00, 0x04, 0x1c,
    ]),
    (DigestAlgorithm::Sha3_256, &[
        0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
        0x08, 0x05, 0x00, 0x04, 0x20,
    ]),
    (DigestAlgorithm::Sha3_384, &[
        0x30, 0x41, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
        0x09, 0x05, 0x00, 0x04, 0x30,
    ]),
    (DigestAlgorithm::Sha3_512, &[
        0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02,
        0x0a, 0x05, 0x00, 0x04, 0x40,
    ]),
];
