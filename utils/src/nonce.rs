//! Deterministic Schnorr nonces. The nonce is bound to the witness and to a
//! caller-supplied context so that re-running a prover on the same inputs
//! reproduces the same commitment points, while any change to the statement
//! changes the nonce.

use crate::{curve::scalar_to_be_bytes, curve::Fr, hashing::keccak256};
use ark_ff::{BigInteger, PrimeField};
use ark_std::vec::Vec;

/// Domain separator for nonce derivation.
pub const NONCE_DOMAIN: &[u8] = b"dleq-nonce-v1";

/// A typed piece of nonce context. Scalars are encoded as 32-byte
/// big-endian values reduced mod N, addresses as their 20 bytes, byte
/// strings verbatim (UTF-8 for text).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoncePart {
    Scalar(Fr),
    Address([u8; 20]),
    Bytes(Vec<u8>),
}

impl NoncePart {
    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            NoncePart::Scalar(s) => out.extend_from_slice(&scalar_to_be_bytes(s)),
            NoncePart::Address(a) => out.extend_from_slice(a),
            NoncePart::Bytes(b) => out.extend_from_slice(b),
        }
    }
}

/// `k = 1 + (Keccak256("dleq-nonce-v1" ‖ enc32(w) ‖ enc(parts…)) mod (N−1))`,
/// always in [1, N).
pub fn deterministic_nonce(w: &Fr, parts: &[NoncePart]) -> Fr {
    let mut input = Vec::with_capacity(NONCE_DOMAIN.len() + 32 * (1 + parts.len()));
    input.extend_from_slice(NONCE_DOMAIN);
    input.extend_from_slice(&scalar_to_be_bytes(w));
    for part in parts {
        part.encode_into(&mut input);
    }
    let digest = keccak256(&input);

    // Reduce the 256-bit digest mod (N−1). N−1 > 2^255, so the digest is
    // below 2·(N−1) and a single conditional subtraction suffices.
    let mut h = <Fr as PrimeField>::BigInt::from_bits_be(&be_bytes_to_bits(&digest));
    let mut n_minus_1 = Fr::MODULUS;
    n_minus_1.sub_with_borrow(&<Fr as PrimeField>::BigInt::from(1u64));
    if h >= n_minus_1 {
        h.sub_with_borrow(&n_minus_1);
    }
    // Infallible: h < N−1 < N after the reduction
    Fr::from_bigint(h).unwrap() + Fr::from(1u64)
}

fn be_bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1 == 1);
        }
    }
    bits
}
