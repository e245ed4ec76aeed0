//! Beaver's transform from random OT to chosen-message OT: each random-OT
//! key is stretched into a one-time pad `Keccak256(tag ‖ key)` under a
//! protocol-level domain tag. Pads are one Keccak output long, so messages
//! are fixed at 32 bytes; higher layers must reject other lengths rather
//! than truncate.

use crate::{
    error::OTError,
    iknp::{RotReceiverKeys, RotSenderKeys},
    Key,
};
use ark_std::vec::Vec;
use vanish_utils::{bits::BitVector, concat_slices, expect_equality, hashing::keccak256};

/// Fixed message and pad length.
pub const MESSAGE_LEN: usize = 32;

fn mask(tag: &[u8], key: &Key, message: &[u8; MESSAGE_LEN]) -> [u8; MESSAGE_LEN] {
    let pad = keccak256(&concat_slices!(tag, key));
    let mut out = [0u8; MESSAGE_LEN];
    for (o, (m, p)) in out.iter_mut().zip(message.iter().zip(pad.iter())) {
        *o = m ^ p;
    }
    out
}

/// Encrypt one chosen message pair per random OT:
/// `ct_j = m_j ⊕ Keccak256(tag ‖ k_j)`.
pub fn encrypt_chosen(
    tag: &[u8],
    keys: &RotSenderKeys,
    messages: &[([u8; MESSAGE_LEN], [u8; MESSAGE_LEN])],
) -> Result<Vec<([u8; MESSAGE_LEN], [u8; MESSAGE_LEN])>, OTError> {
    expect_equality!(
        messages.len(),
        keys.len(),
        OTError::IncorrectNumberOfMessagePairs
    );
    Ok(keys
        .0
        .iter()
        .zip(messages.iter())
        .map(|((k0, k1), (m0, m1))| (mask(tag, k0, m0), mask(tag, k1, m1)))
        .collect())
}

/// Recover the chosen message of each pair with the single key the
/// random OT handed the receiver.
pub fn decrypt_chosen(
    tag: &[u8],
    keys: &RotReceiverKeys,
    choices: &BitVector,
    encryptions: &[([u8; MESSAGE_LEN], [u8; MESSAGE_LEN])],
) -> Result<Vec<[u8; MESSAGE_LEN]>, OTError> {
    expect_equality!(
        encryptions.len(),
        keys.len(),
        OTError::IncorrectNumberOfCiphertexts
    );
    expect_equality!(choices.len(), keys.len(), OTError::IncorrectNumberOfChoices);
    Ok(keys
        .0
        .iter()
        .zip(encryptions.iter())
        .enumerate()
        .map(|(i, (key, (e0, e1)))| {
            let chosen = if choices.get(i) { e1 } else { e0 };
            mask(tag, key, chosen)
        })
        .collect())
}
