#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Threshold production of KZG-DLEQ zero-evaluation proofs. The
//! trusted-setup power vector `[s^0, …, s^d]` is additively shared across
//! nodes, so every commitment, witness and Schnorr response is a sum of
//! per-node contributions and no party ever holds `s` or the full
//! quotient evaluation. Two prover shapes are provided: the two-round
//! interactive protocol, and a single-round variant whose responses are
//! masked by precomputed oblivious-linear-evaluation samples.

extern crate alloc;

pub mod error;
pub mod interactive;
pub mod srs_sharing;
pub mod vole;

pub use error::ThresholdError;
pub use interactive::{finalize, round1, round1_all, Aggregated, Round1Message, Round1State};
pub use srs_sharing::{share_srs, SrsShareVector};
pub use vole::{vole_finalize, vole_round, VoleNodeMessage};
