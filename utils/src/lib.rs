//! Shared utilities for the vanish proof suite: concrete secp256k1 curve
//! aliases and byte encodings, Keccak-256 and HKDF-Keccak hashing, EVM
//! address derivation, deterministic Schnorr nonces, packed bit containers
//! with matrix transpose, fixed-base multiplication tables and inner
//! products over the scalar field.

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

extern crate alloc;

pub mod bits;
pub mod curve;
/// Finite field utilities like inner product over scalar slices
pub mod ff;
/// Keccak-256, HKDF-Keccak and EVM address derivation
pub mod hashing;
pub mod macros;
/// Fixed-base multiscalar multiplication tables
pub mod msm;
/// Deterministic Schnorr nonce derivation
pub mod nonce;
pub mod serde_utils;
