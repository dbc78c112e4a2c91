//! Keys bound to an overriding method.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use common::*;
use rsa_core::pkcs1v15::SigningKey;
use rsa_core::signature::{Keypair, Signer, Verifier};
use rsa_core::{Capabilities, DigestAlgorithm, Error, KeyFlags, Padding, Result, RsaKey, RsaMethod};

/// Performs private operations with a key the caller never sees.
struct Offload {
    inner: RsaKey,
    capabilities: Capabilities,
    calls: AtomicUsize,
    finishes: AtomicUsize,
}

impl Offload {
    fn new(capabilities: Capabilities) -> Arc<Self> {
        Arc::new(Self {
            inner: kat_key(),
            capabilities,
            calls: AtomicUsize::new(0),
            finishes: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RsaMethod for Offload {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn flags(&self) -> KeyFlags {
        KeyFlags::OPAQUE
    }

    fn finish(&self, _key: &RsaKey) {
        self.finishes.fetch_add(1, Ordering::SeqCst);
    }

    fn sign_raw(&self, _key: &RsaKey, out: &mut [u8], input: &[u8], padding: Padding) -> isize {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.inner.sign_raw(out, input, padding) {
            Ok(len) => len as isize,
            Err(_) => -1,
        }
    }

    fn decrypt(&self, _key: &RsaKey, out: &mut [u8], input: &[u8], padding: Padding) -> isize {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.inner.decrypt(input, padding) {
            Ok(plaintext) => {
                out[..plaintext.len()].copy_from_slice(&plaintext);
                plaintext.len() as isize
            }
            Err(_) => -1,
        }
    }

    fn sign(&self, _key: &RsaKey, algorithm: DigestAlgorithm, digest: &[u8]) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(digest.len(), algorithm.output_size());
        self.inner.sign(algorithm, digest)
    }

    fn private_transform(&self, _key: &RsaKey, out: &mut [u8], input: &[u8]) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.private_transform(out, input)
    }
}

fn bound_public_key(method: Arc<Offload>) -> RsaKey {
    let mut key = RsaKey::with_method(method).unwrap();
    key.set_key(Some(uint(&KAT_N)), Some(f4()), None).unwrap();
    key
}

#[test]
fn test_sign_raw_override() {
    let method = Offload::new(Capabilities::SIGN_RAW | Capabilities::FINISH);
    let key = bound_public_key(method.clone());
    assert!(key.is_opaque());
    assert!(key.d().is_none());

    let digest = DigestAlgorithm::Sha256.digest(b"Test.\n");
    let sig = key.sign(DigestAlgorithm::Sha256, &digest).unwrap();
    assert_eq!(method.calls(), 1);
    assert_eq!(key.verify(DigestAlgorithm::Sha256, &digest, &sig), Ok(()));
    assert_eq!(kat_key().sign(DigestAlgorithm::Sha256, &digest).unwrap(), sig);

    // Not advertised, so the built-in implementation runs and finds no `d`.
    let mut out = vec![0u8; key.size()];
    assert_eq!(
        key.private_transform(&mut out, &sig),
        Err(Error::MissingValue)
    );
    assert_eq!(method.calls(), 1);
}

#[test]
fn test_sign_override_receives_checked_digest() {
    let method = Offload::new(Capabilities::SIGN);
    let key = bound_public_key(method.clone());

    assert_eq!(
        key.sign(DigestAlgorithm::Sha256, &[0u8; 31]),
        Err(Error::InvalidMessageLength)
    );
    assert_eq!(method.calls(), 0);

    let sig = key.digest_sign(DigestAlgorithm::Sha1, b"Test.\n").unwrap();
    assert_eq!(method.calls(), 1);
    assert_eq!(key.digest_verify(DigestAlgorithm::Sha1, b"Test.\n", &sig), Ok(()));
}

#[test]
fn test_decrypt_and_transform_overrides() {
    let method = Offload::new(Capabilities::DECRYPT | Capabilities::PRIVATE_TRANSFORM);
    let key = bound_public_key(method.clone());

    let ciphertext = key.encrypt(b"offloaded", Padding::Pkcs1).unwrap();
    assert_eq!(key.decrypt(&ciphertext, Padding::Pkcs1).unwrap(), b"offloaded");

    let mut out = vec![0u8; key.size()];
    key.private_transform(&mut out, &ciphertext).unwrap();
    assert_eq!(method.calls(), 2);
    assert_eq!(out, kat_key().decrypt(&ciphertext, Padding::None).unwrap());
}

#[test]
fn test_finish_runs_once_across_holders() {
    let method = Offload::new(Capabilities::SIGN_RAW | Capabilities::FINISH);
    let signing_key = SigningKey::new(
        Arc::new(bound_public_key(method.clone())),
        DigestAlgorithm::Sha256,
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let signing_key = signing_key.clone();
            thread::spawn(move || {
                let msg = [i as u8; 16];
                let signature = signing_key.sign(&msg);
                signing_key.verifying_key().verify(&msg, &signature).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(method.calls(), 4);
    assert_eq!(method.finishes.load(Ordering::SeqCst), 0);
    drop(signing_key);
    assert_eq!(method.finishes.load(Ordering::SeqCst), 1);
}

struct Broken;

impl RsaMethod for Broken {
    fn capabilities(&self) -> Capabilities {
        Capabilities::SIGN_RAW | Capabilities::VERIFY_RAW | Capabilities::ENCRYPT | Capabilities::SIZE
    }

    fn size(&self, _key: &RsaKey) -> usize {
        64
    }

    fn sign_raw(&self, _key: &RsaKey, _out: &mut [u8], _input: &[u8], _padding: Padding) -> isize {
        -1
    }

    fn verify_raw(&self, _key: &RsaKey, out: &mut [u8], _sig: &[u8], _padding: Padding) -> isize {
        out.len() as isize + 1
    }
}

#[test]
fn test_legacy_failures_become_errors() {
    let mut key = RsaKey::with_method(Arc::new(Broken)).unwrap();
    key.set_key(Some(uint(&KAT_N)), Some(f4()), Some(uint(&KAT_D)))
        .unwrap();
    assert_eq!(key.size(), 64);
    assert!(!key.is_opaque());

    let digest = DigestAlgorithm::Sha256.digest(b"Test.\n");
    assert_eq!(
        key.sign(DigestAlgorithm::Sha256, &digest),
        Err(Error::Internal)
    );
    assert_eq!(
        key.verify(DigestAlgorithm::Sha256, &digest, &[0u8; 64]),
        Err(Error::Internal)
    );
    // Advertised but left at the default, which reports failure.
    assert_eq!(
        key.encrypt(b"x", Padding::Pkcs1),
        Err(Error::Internal)
    );
}

#[test]
fn test_rebinding_skips_init() {
    let mut key = kat_key_minimal();
    assert!(key.method().is_none());
    assert!(!key.is_opaque());

    let method = Offload::new(Capabilities::SIGN_RAW);
    key.set_method(method.clone());
    assert!(key.method().is_some());
    assert!(key.is_opaque());

    let sig = key.digest_sign(DigestAlgorithm::Sha1, b"Test.\n").unwrap();
    assert_eq!(method.calls(), 1);
    assert_eq!(key.digest_verify(DigestAlgorithm::Sha1, b"Test.\n", &sig), Ok(()));
}
