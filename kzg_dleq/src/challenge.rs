//! Fiat–Shamir challenge with the exact byte packing the on-chain verifier
//! hashes. Any deviation from this layout breaks on-chain verification, so
//! every prover and verifier path in the workspace funnels through here.

use crate::error::KzgDleqError;
use ark_std::vec::Vec;
use vanish_utils::{
    curve::{affine_coords, base_field_to_be_bytes, coordinate_parity, scalar_to_be_bytes, Affine, Fq, Fr},
    hashing::{ec_address, scalar_from_keccak},
};

/// Version byte prefixed to the challenge input.
pub const CHALLENGE_VERSION: u8 = 1;

/// Exact length of the hashed packing:
/// 1 + 32·4 (Cx, Wx, Px, Py) + 20·2 (A1, A2) + 32 (x) + 1 (parity).
pub const CHALLENGE_INPUT_LEN: usize = 202;

/// Low bits of the commitment and witness y-coordinates:
/// `(Cy & 1) | ((Wy & 1) << 1)`.
pub fn parity_byte(cy: &Fq, wy: &Fq) -> u8 {
    coordinate_parity(cy) | (coordinate_parity(wy) << 1)
}

/// `e = Keccak256(0x01 ‖ Cx ‖ Wx ‖ Px ‖ Py ‖ A1 ‖ A2 ‖ x ‖ parity) mod N`
/// over 32-byte big-endian coordinates and scalars and 20-byte addresses.
pub fn build_challenge(
    cx: &Fq,
    wx: &Fq,
    px: &Fq,
    py: &Fq,
    a1_addr: &[u8; 20],
    a2_addr: &[u8; 20],
    x: &Fr,
    parity: u8,
) -> Fr {
    let mut input = Vec::with_capacity(CHALLENGE_INPUT_LEN);
    input.push(CHALLENGE_VERSION);
    input.extend_from_slice(&base_field_to_be_bytes(cx));
    input.extend_from_slice(&base_field_to_be_bytes(wx));
    input.extend_from_slice(&base_field_to_be_bytes(px));
    input.extend_from_slice(&base_field_to_be_bytes(py));
    input.extend_from_slice(a1_addr);
    input.extend_from_slice(a2_addr);
    input.extend_from_slice(&scalar_to_be_bytes(x));
    input.push(parity);
    debug_assert_eq!(input.len(), CHALLENGE_INPUT_LEN);
    scalar_from_keccak(&input)
}

/// Challenge for a full proof transcript. Fails when any point is the
/// identity and so has no coordinates to pack.
pub fn challenge_for_proof(
    C: &Affine,
    W: &Affine,
    P: &Affine,
    A1: &Affine,
    A2: &Affine,
    x: &Fr,
) -> Result<Fr, KzgDleqError> {
    let (cx, cy) = affine_coords(C).ok_or(KzgDleqError::PointAtInfinity)?;
    let (wx, wy) = affine_coords(W).ok_or(KzgDleqError::PointAtInfinity)?;
    let (px, py) = affine_coords(P).ok_or(KzgDleqError::PointAtInfinity)?;
    let a1_addr = ec_address(A1).ok_or(KzgDleqError::PointAtInfinity)?;
    let a2_addr = ec_address(A2).ok_or(KzgDleqError::PointAtInfinity)?;
    Ok(build_challenge(
        &cx,
        &wx,
        &px,
        &py,
        &a1_addr,
        &a2_addr,
        x,
        parity_byte(&cy, &wy),
    ))
}
