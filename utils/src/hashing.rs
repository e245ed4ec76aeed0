//! Keccak-256 hashing, HKDF-Keccak key expansion and EVM address
//! derivation. Keccak-256 is the only hash in the suite because the on-chain
//! verifier reconstructs every digest with the KECCAK256 opcode.

use crate::curve::{affine_coords, base_field_to_be_bytes, Affine, Fr};
use ark_ff::PrimeField;
use ark_std::vec::Vec;
use hkdf::Hkdf;
use sha3::{Digest, Keccak256};

/// Largest output a single HKDF-expand can produce (255 blocks).
const HKDF_MAX_OUTPUT: usize = 255 * 32;

pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Hash arbitrary bytes to a scalar, reducing the digest mod N.
pub fn scalar_from_keccak(bytes: &[u8]) -> Fr {
    Fr::from_be_bytes_mod_order(&keccak256(bytes))
}

/// HKDF with Keccak-256 as the underlying hash, empty salt. Output length
/// is capped at a single expand (8160 bytes); key derivation call sites in
/// this suite ask for at most 64.
pub fn hkdf_keccak256(ikm: &[u8], info: &[u8], okm: &mut [u8]) {
    assert!(okm.len() <= HKDF_MAX_OUTPUT);
    let hk = Hkdf::<Keccak256>::new(None, ikm);
    // Infallible: length checked above
    hk.expand(info, okm).unwrap();
}

/// Unbounded-length HKDF-Keccak stream: the output is produced in
/// 8160-byte blocks, each expanded with the block index appended to `info`.
pub fn hkdf_keccak256_blocks(ikm: &[u8], info: &[u8], okm: &mut [u8]) {
    let hk = Hkdf::<Keccak256>::new(None, ikm);
    for (i, block) in okm.chunks_mut(HKDF_MAX_OUTPUT).enumerate() {
        let mut block_info = Vec::with_capacity(info.len() + 4);
        block_info.extend_from_slice(info);
        block_info.extend_from_slice(&(i as u32).to_be_bytes());
        hk.expand(&block_info, block).unwrap();
    }
}

/// EVM-style address of a point: the low 20 bytes of
/// Keccak256(x ‖ y) over 32-byte big-endian coordinates. `None` for the
/// point at infinity, which has no coordinates to hash.
pub fn ec_address(p: &Affine) -> Option<[u8; 20]> {
    let (x, y) = affine_coords(p)?;
    let mut bytes = [0u8; 64];
    bytes[..32].copy_from_slice(&base_field_to_be_bytes(&x));
    bytes[32..].copy_from_slice(&base_field_to_be_bytes(&y));
    let digest = keccak256(&bytes);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&digest[12..]);
    Some(addr)
}
