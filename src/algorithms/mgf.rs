//! MGF1 mask generation for PSS padding

use digest::DynDigest;

/// XORs `out` with the MGF1 mask generated from `seed`.
///
/// Panics if out is larger than 2**32. This is in accordance with RFC 8017 - PKCS #1 B.2.1
pub(crate) fn mgf1_xor(out: &mut [u8], digest: &mut dyn DynDigest, seed: &[u8]) {
    const MAX_LEN: u64 = u32::MAX as u64 + 1;
    assert!(out.len() as u64 <= MAX_LEN);

    let mut counter = [0u8; 4];
    let mut i = 0;
    while i < out.len() {
        digest.update(seed);
        digest.update(&counter);

        let block = digest.finalize_reset();
        for byte in block.iter() {
            if i >= out.len() {
                break;
            }
            out[i] ^= byte;
            i += 1;
        }
        inc_counter(&mut counter);
    }
}

fn inc_counter(counter: &mut [u8; 4]) {
    for i in (0..4).rev() {
        counter[i] = counter[i].wrapping_add(1);
        if counter[i] != 0 {
            // No overflow
            return;
        }
    }
}
