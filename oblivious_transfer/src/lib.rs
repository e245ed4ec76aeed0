#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Oblivious transfer stack used to mask the threshold prover's responses:
//! Chou-Orlandi 1-of-2 base OT over secp256k1, IKNP random-OT extension,
//! the Beaver transform from random OT to chosen-message OT, and a
//! bit-decomposition ROLE producing pools of oblivious linear evaluation
//! samples `(a, b)` / `(x, a·x + b)` over the scalar field.

extern crate alloc;

pub mod base_ot;
pub mod beaver;
pub mod error;
pub mod iknp;
pub mod role;

pub type Bit = bool;
/// Hashed OT key, always a Keccak-256 output.
pub type Key = [u8; 32];
/// Base OT plaintext.
pub type Message = ark_std::vec::Vec<u8>;
