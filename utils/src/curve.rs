//! Concrete secp256k1 types and byte encodings. Every scalar lives in the
//! group order field `Fr` (called N on the EVM side) and every coordinate in
//! the base field `Fq` (called P). Encodings are 32-byte big-endian, the
//! layout the on-chain verifier reads.

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInteger, PrimeField, Zero};
use ark_std::rand::RngCore;
use ark_std::UniformRand;

pub type Affine = ark_secp256k1::Affine;
pub type Projective = ark_secp256k1::Projective;
pub type Fr = ark_secp256k1::Fr;
pub type Fq = ark_secp256k1::Fq;

/// The base point G.
pub fn generator() -> Affine {
    Affine::generator()
}

/// 32-byte big-endian encoding of a scalar in [0, N).
pub fn scalar_to_be_bytes(s: &Fr) -> [u8; 32] {
    let mut out = [0u8; 32];
    let bytes = s.into_bigint().to_bytes_be();
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// 32-byte big-endian encoding of a coordinate in [0, P).
pub fn base_field_to_be_bytes(c: &Fq) -> [u8; 32] {
    let mut out = [0u8; 32];
    let bytes = c.into_bigint().to_bytes_be();
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Affine coordinates of a point, `None` for the point at infinity.
pub fn affine_coords(p: &Affine) -> Option<(Fq, Fq)> {
    p.xy().map(|(x, y)| (*x, *y))
}

/// Parity bit of a coordinate, as the EVM's `Qy & 1`.
pub fn coordinate_parity(c: &Fq) -> u8 {
    c.into_bigint().is_odd() as u8
}

/// Diffie-Hellman shared secret: the 32-byte big-endian x-coordinate of
/// `sk * pk`. `None` when the product is the point at infinity, which a
/// protocol must treat as a failure rather than a usable secret.
pub fn ecdh(sk: &Fr, pk: &Affine) -> Option<[u8; 32]> {
    let shared = (*pk * *sk).into_affine();
    affine_coords(&shared).map(|(x, _)| base_field_to_be_bytes(&x))
}

/// Uniform scalar in [1, N).
pub fn nonzero_scalar<R: RngCore>(rng: &mut R) -> Fr {
    loop {
        let s = Fr::rand(rng);
        if !s.is_zero() {
            return s;
        }
    }
}
