#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Proof that a committed univariate polynomial over the secp256k1 scalar
//! field vanishes at a public point `x`, i.e. `p(x) = 0`.
//!
//! The commitment is KZG-style against a trusted-setup point `P = s·G`:
//! `C = p(s)·G` and a witness `W = q(s)·G` for the quotient
//! `q(X) = p(X) / (X − x)`. A Schnorr DLEQ argument then shows that
//! `log_G(W) = log_T(C)` for `T = P − x·G`, which holds exactly when
//! `p(s) = (s − x)·q(s)`, i.e. when the division left no remainder and so
//! `p(x) = 0`.
//!
//! The Fiat–Shamir challenge and the calldata encoder are bit-exact with
//! the on-chain assembly verifier, which replays the same algebra through
//! the ecrecover precompile.

extern crate alloc;

pub mod challenge;
pub mod error;
pub mod evm;
pub mod polynomial;
pub mod proof;
pub mod srs;

pub use challenge::challenge_for_proof;
pub use error::KzgDleqError;
pub use polynomial::Polynomial;
pub use proof::{DleqProof, DleqProver};
pub use srs::Srs;
