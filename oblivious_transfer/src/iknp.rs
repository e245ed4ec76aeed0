//! IKNP random-OT extension: `k` base OTs with the roles reversed are
//! stretched into `n` random OTs. The extension sender (who ends up with
//! the key pairs) plays the base-OT receiver with a random selector vector
//! `c`; the extension receiver (who ends up with one key per OT) plays the
//! base-OT sender, transferring the columns of its random bit matrix `T`
//! and `T ⊕ r`. Row hashes under Keccak-256 become the output keys.

use crate::{
    base_ot::{CiphertextPair, OTReceiver, OTSenderSetup, ReceiverPubKeys},
    error::OTError,
    Key,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_into_iter, rand::RngCore, vec::Vec};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use vanish_utils::{
    bits::{divide_by_8, is_multiple_of_8, xor, BitMatrix, BitVector},
    curve::Affine,
    expect_equality,
    hashing::keccak256,
};

/// Extension parameters: `num_base_ot` is the computational security
/// parameter `k` (typically 128), `num_extensions` the number of random
/// OTs produced. Both must be multiples of 8 for the packed transpose.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct IknpConfig {
    pub num_base_ot: u16,
    pub num_extensions: u32,
}

impl IknpConfig {
    pub fn new(num_base_ot: u16, num_extensions: u32) -> Result<Self, OTError> {
        if num_base_ot == 0 || num_extensions == 0 {
            return Err(OTError::NeedNonZeroNumberOfOTs);
        }
        if !is_multiple_of_8(num_base_ot as usize) {
            return Err(OTError::SecurityParameterMustBeMultipleOf8(num_base_ot));
        }
        if !is_multiple_of_8(num_extensions as usize) {
            return Err(OTError::ExtensionCountMustBeMultipleOf8(num_extensions));
        }
        Ok(Self {
            num_base_ot,
            num_extensions,
        })
    }

    /// Bytes per transferred column.
    pub fn column_byte_size(&self) -> usize {
        divide_by_8(self.num_extensions as usize)
    }
}

/// Key pairs held by the extension sender after round 2.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct RotSenderKeys(pub Vec<(Key, Key)>);

/// Per-OT keys held by the extension receiver; `keys[i]` equals the
/// sender's `k0[i]` or `k1[i]` according to choice bit `r[i]`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct RotReceiverKeys(pub Vec<Key>);

impl RotSenderKeys {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl RotReceiverKeys {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Extension sender state between base-OT round 1 and round 2.
pub struct ExtensionSender {
    config: IknpConfig,
    selector: BitVector,
    base: OTReceiver,
}

impl ExtensionSender {
    /// Round 1: sample the selector vector and enter the base OT as
    /// receiver against the extension receiver's long-term public key.
    pub fn new<R: RngCore>(
        rng: &mut R,
        config: IknpConfig,
        base_pk: &Affine,
    ) -> Result<(Self, ReceiverPubKeys), OTError> {
        let selector = BitVector::random(rng, config.num_base_ot as usize);
        let (base, pubkeys) = OTReceiver::new(rng, selector.to_bools(), base_pk)?;
        Ok((
            Self {
                config,
                selector,
                base,
            },
            pubkeys,
        ))
    }

    /// Round 2: decrypt the transferred columns into the matrix `Q` and
    /// hash its rows into key pairs. Column `j` of `Q` is `T_j` when
    /// `c_j = 0` and `T_j ⊕ r` when `c_j = 1`, so row `i` of `Q` is
    /// `row_i(T) ⊕ (r_i ? c : 0)` and `k0/k1` land as
    /// `k_{r[i]} = keys[i]` on the receiver side.
    pub fn derive_keys(
        self,
        encryptions: Vec<CiphertextPair>,
    ) -> Result<RotSenderKeys, OTError> {
        let columns = self.base.decrypt(encryptions)?;
        let column_size = self.config.column_byte_size();
        let mut bytes = Vec::with_capacity(self.config.num_base_ot as usize * column_size);
        for column in &columns {
            expect_equality!(column.len(), column_size, OTError::IncorrectColumnLength);
            bytes.extend_from_slice(column);
        }
        // Infallible: dimensions checked column by column above
        let q_columns = BitMatrix::from_parts(
            bytes,
            self.config.num_base_ot as usize,
            self.config.num_extensions as usize,
        )
        .unwrap();
        let Q = q_columns.transpose();
        let selector_bytes = self.selector.as_bytes();
        let keys = cfg_into_iter!(0..self.config.num_extensions as usize)
            .map(|i| {
                let row = Q.row(i);
                (keccak256(row), keccak256(&xor(row, selector_bytes)))
            })
            .collect();
        Ok(RotSenderKeys(keys))
    }
}

/// Extension receiver state: the choice bits `r` and the random matrix
/// `T`, stored column-major (row `j` of the container is column `j` of
/// `T`).
pub struct ExtensionReceiver {
    config: IknpConfig,
    choices: BitVector,
    t_columns: BitMatrix,
}

impl ExtensionReceiver {
    /// Round 1: fix the choice vector (caller-supplied for chosen-input
    /// protocols, random otherwise) and sample `T`.
    pub fn new<R: RngCore>(
        rng: &mut R,
        config: IknpConfig,
        choices: Option<BitVector>,
    ) -> Result<Self, OTError> {
        let choices = match choices {
            Some(c) => {
                expect_equality!(
                    c.len(),
                    config.num_extensions as usize,
                    OTError::IncorrectNumberOfChoices
                );
                c
            }
            None => BitVector::random(rng, config.num_extensions as usize),
        };
        let t_columns = BitMatrix::random(
            rng,
            config.num_base_ot as usize,
            config.num_extensions as usize,
        );
        Ok(Self {
            config,
            choices,
            t_columns,
        })
    }

    /// Transfer the column pairs `(T_j, T_j ⊕ r)` through the base OT,
    /// acting as base-OT sender.
    pub fn transfer<R: RngCore>(
        &self,
        rng: &mut R,
        base: &OTSenderSetup,
        pubkeys: &ReceiverPubKeys,
    ) -> Result<Vec<CiphertextPair>, OTError> {
        let choice_bytes = self.choices.as_bytes();
        let messages = (0..self.config.num_base_ot as usize)
            .map(|j| {
                let column = self.t_columns.row(j);
                (column.to_vec(), xor(column, choice_bytes))
            })
            .collect();
        base.encrypt(rng, pubkeys, messages)
    }

    /// The receiver's output keys: Keccak-256 of each row of `T`.
    pub fn derive_keys(&self) -> RotReceiverKeys {
        let T = self.t_columns.transpose();
        RotReceiverKeys(
            cfg_into_iter!(0..self.config.num_extensions as usize)
                .map(|i| keccak256(T.row(i)))
                .collect(),
        )
    }

    pub fn choices(&self) -> &BitVector {
        &self.choices
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    /// Full in-process extension: base OT round trip plus both round 2s.
    pub fn run_extension(
        rng: &mut StdRng,
        config: IknpConfig,
        choices: Option<BitVector>,
    ) -> (RotSenderKeys, RotReceiverKeys, BitVector) {
        let base = OTSenderSetup::new(rng);
        let receiver = ExtensionReceiver::new(rng, config, choices).unwrap();
        let (sender, base_pubkeys) = ExtensionSender::new(rng, config, &base.A).unwrap();
        let encryptions = receiver.transfer(rng, &base, &base_pubkeys).unwrap();
        let sender_keys = sender.derive_keys(encryptions).unwrap();
        let receiver_keys = receiver.derive_keys();
        (sender_keys, receiver_keys, receiver.choices.clone())
    }

    #[test]
    fn receiver_key_matches_chosen_sender_key() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let config = IknpConfig::new(128, 256).unwrap();
        let (sender_keys, receiver_keys, choices) = run_extension(&mut rng, config, None);
        assert_eq!(sender_keys.len(), 256);
        assert_eq!(receiver_keys.len(), 256);
        for i in 0..256 {
            let expected = if choices.get(i) {
                sender_keys.0[i].1
            } else {
                sender_keys.0[i].0
            };
            assert_eq!(receiver_keys.0[i], expected);
            // the other branch stays hidden
            let other = if choices.get(i) {
                sender_keys.0[i].0
            } else {
                sender_keys.0[i].1
            };
            assert_ne!(receiver_keys.0[i], other);
        }
    }

    #[test]
    fn caller_supplied_choices_are_respected() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let config = IknpConfig::new(16, 64).unwrap();
        let wanted = BitVector::random(&mut rng, 64);
        let (sender_keys, receiver_keys, choices) =
            run_extension(&mut rng, config, Some(wanted.clone()));
        assert_eq!(choices, wanted);
        for i in 0..64 {
            let expected = if wanted.get(i) {
                sender_keys.0[i].1
            } else {
                sender_keys.0[i].0
            };
            assert_eq!(receiver_keys.0[i], expected);
        }
    }

    #[test]
    fn config_validation() {
        assert!(IknpConfig::new(0, 8).is_err());
        assert!(IknpConfig::new(8, 0).is_err());
        assert_eq!(
            IknpConfig::new(12, 8).err(),
            Some(OTError::SecurityParameterMustBeMultipleOf8(12))
        );
        assert_eq!(
            IknpConfig::new(8, 12).err(),
            Some(OTError::ExtensionCountMustBeMultipleOf8(12))
        );
        assert!(IknpConfig::new(128, 256).is_ok());
    }

    #[test]
    fn wrong_choice_count_rejected() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let config = IknpConfig::new(16, 64).unwrap();
        let short = BitVector::random(&mut rng, 32);
        assert_eq!(
            ExtensionReceiver::new(&mut rng, config, Some(short)).err(),
            Some(OTError::IncorrectNumberOfChoices(32, 64))
        );
    }
}
