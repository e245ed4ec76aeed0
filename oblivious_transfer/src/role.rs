//! Random oblivious linear evaluation by bit decomposition. One OLE of
//! input width ℓ consumes ℓ extended OTs: the receiver's choice bits are
//! the little-endian bits of its input `x`, and the sender offers
//! `(r_j, r_j + a·2^j)` per bit so the chosen sum telescopes to
//! `y = b + a·x` with `b = Σ_j r_j`. Samples are precomputed into pools
//! and consumed through a monotone index, one challenge per sample.

use crate::{
    beaver::{decrypt_chosen, encrypt_chosen, MESSAGE_LEN},
    error::OTError,
    iknp::{IknpConfig, RotReceiverKeys, RotSenderKeys},
};
use ark_ff::{BigInteger, Field, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec::Vec};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use vanish_utils::{
    bits::{is_multiple_of_8, scalar_from_bits, BitMatrix, BitVector},
    concat_slices,
    curve::{scalar_to_be_bytes, Fr},
    expect_equality,
    hashing::{keccak256, scalar_from_keccak},
    serde_utils::ArkObjectBytes,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Domain tag for deriving the sender's multiplier `a` per OLE.
pub const ROLE_A_DOMAIN: &[u8] = b"role-a";
/// Domain tag for seeding the per-bit mask matrix.
pub const ROLE_PRG_DOMAIN: &[u8] = b"role-prg";
/// Beaver domain tag for the per-bit message pairs.
pub const ROLE_OT_TAG: &[u8] = b"role-ot";

/// Pool parameters. `bit_length` is the OLE input width ℓ, at most 256.
/// Up to 255 the decomposition is injective outright; the full width of
/// 256 is reserved for inputs that are canonical scalar decompositions,
/// which is what the VOLE masking feeds in (the challenge itself).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct RoleConfig {
    pub num_oles: u32,
    pub bit_length: u16,
    pub num_base_ot: u16,
}

impl RoleConfig {
    pub fn new(num_oles: u32, bit_length: u16, num_base_ot: u16) -> Result<Self, OTError> {
        if num_oles == 0 || bit_length == 0 {
            return Err(OTError::NeedNonZeroNumberOfOTs);
        }
        if bit_length > 256 {
            return Err(OTError::BitLengthTooLargeForField(bit_length));
        }
        let config = Self {
            num_oles,
            bit_length,
            num_base_ot,
        };
        if !is_multiple_of_8(config.total_ots() as usize) {
            return Err(OTError::ExtensionCountMustBeMultipleOf8(config.total_ots()));
        }
        Ok(config)
    }

    /// Extended OTs consumed by the whole pool: one per input bit.
    pub fn total_ots(&self) -> u32 {
        self.num_oles * self.bit_length as u32
    }

    pub fn iknp_config(&self) -> Result<IknpConfig, OTError> {
        IknpConfig::new(self.num_base_ot, self.total_ots())
    }
}

/// A consumed sender-side sample.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop, CanonicalSerialize, CanonicalDeserialize,
    Serialize, Deserialize,
)]
pub struct RoleSenderSample {
    #[zeroize(skip)]
    pub index: u32,
    #[serde_as(as = "ArkObjectBytes")]
    pub a: Fr,
    #[serde_as(as = "ArkObjectBytes")]
    pub b: Fr,
}

/// A consumed receiver-side sample, satisfying `y = a·x + b`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop, CanonicalSerialize, CanonicalDeserialize,
    Serialize, Deserialize,
)]
pub struct RoleReceiverSample {
    #[zeroize(skip)]
    pub index: u32,
    #[serde_as(as = "ArkObjectBytes")]
    pub x: Fr,
    #[serde_as(as = "ArkObjectBytes")]
    pub y: Fr,
}

/// Sender-side pool of `(a, b)` pairs with monotone consumption.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop, CanonicalSerialize, CanonicalDeserialize,
    Serialize, Deserialize,
)]
pub struct RoleSenderPool {
    #[serde_as(as = "Vec<(ArkObjectBytes, ArkObjectBytes)>")]
    samples: Vec<(Fr, Fr)>,
    #[zeroize(skip)]
    next_index: u32,
}

/// Receiver-side pool of `(x, y)` pairs with monotone consumption.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop, CanonicalSerialize, CanonicalDeserialize,
    Serialize, Deserialize,
)]
pub struct RoleReceiverPool {
    #[serde_as(as = "Vec<(ArkObjectBytes, ArkObjectBytes)>")]
    samples: Vec<(Fr, Fr)>,
    #[zeroize(skip)]
    next_index: u32,
}

impl RoleSenderPool {
    pub fn take_next(&mut self) -> Result<RoleSenderSample, OTError> {
        let index = self.next_index;
        let (a, b) = *self
            .samples
            .get(index as usize)
            .ok_or(OTError::PoolExhausted(index, self.samples.len() as u32))?;
        self.next_index += 1;
        Ok(RoleSenderSample { index, a, b })
    }

    pub fn remaining(&self) -> u32 {
        self.samples.len() as u32 - self.next_index
    }
}

impl RoleReceiverPool {
    pub fn take_next(&mut self) -> Result<RoleReceiverSample, OTError> {
        let index = self.next_index;
        let (x, y) = *self
            .samples
            .get(index as usize)
            .ok_or(OTError::PoolExhausted(index, self.samples.len() as u32))?;
        self.next_index += 1;
        Ok(RoleReceiverSample { index, x, y })
    }

    pub fn remaining(&self) -> u32 {
        self.samples.len() as u32 - self.next_index
    }
}

/// OLE sender: the IKNP extension sender, holding one key pair per input
/// bit.
pub struct RoleSender {
    config: RoleConfig,
    keys: RotSenderKeys,
}

impl RoleSender {
    pub fn new(config: RoleConfig, keys: RotSenderKeys) -> Result<Self, OTError> {
        expect_equality!(
            keys.len(),
            config.total_ots() as usize,
            OTError::IncorrectNumberOfBaseOTKeys
        );
        Ok(Self { config, keys })
    }

    /// Round 2: derive the per-OLE multiplier `a_i` and per-bit masks, and
    /// encrypt the correlated message pairs. Returns the local pool of
    /// `(a_i, b_i)` and the ciphertexts for the receiver.
    pub fn round2(
        &self,
    ) -> Result<(RoleSenderPool, Vec<([u8; MESSAGE_LEN], [u8; MESSAGE_LEN])>), OTError> {
        let num_oles = self.config.num_oles as usize;
        let bit_length = self.config.bit_length as usize;
        let total = self.config.total_ots() as usize;

        // One 256-bit mask row per input bit, all expanded from the first
        // key pair so both rounds of a session agree on the stream.
        let seed = keccak256(&concat_slices!(
            ROLE_PRG_DOMAIN,
            self.keys.0[0].0,
            self.keys.0[0].1
        ));
        let mask_rows = BitMatrix::from_seed(&seed, total, 256);

        let mut samples = Vec::with_capacity(num_oles);
        let mut messages = Vec::with_capacity(total);
        for i in 0..num_oles {
            let (first_k0, first_k1) = &self.keys.0[i * bit_length];
            let a = scalar_from_keccak(&concat_slices!(ROLE_A_DOMAIN, first_k0, first_k1));
            let mut b = Fr::zero();
            let mut power_of_two = Fr::ONE;
            for j in 0..bit_length {
                let r = Fr::from_le_bytes_mod_order(mask_rows.row(i * bit_length + j));
                b += r;
                let m1 = r + a * power_of_two;
                messages.push((scalar_to_be_bytes(&r), scalar_to_be_bytes(&m1)));
                power_of_two.double_in_place();
            }
            samples.push((a, b));
        }
        let encryptions = encrypt_chosen(ROLE_OT_TAG, &self.keys, &messages)?;
        Ok((
            RoleSenderPool {
                samples,
                next_index: 0,
            },
            encryptions,
        ))
    }
}

/// OLE receiver: the IKNP extension receiver, whose choice bits are the
/// little-endian bits of the inputs.
pub struct RoleReceiver {
    config: RoleConfig,
    choices: BitVector,
    keys: RotReceiverKeys,
}

impl RoleReceiver {
    pub fn new(
        config: RoleConfig,
        choices: BitVector,
        keys: RotReceiverKeys,
    ) -> Result<Self, OTError> {
        expect_equality!(
            choices.len(),
            config.total_ots() as usize,
            OTError::IncorrectNumberOfChoices
        );
        expect_equality!(
            keys.len(),
            config.total_ots() as usize,
            OTError::IncorrectNumberOfBaseOTKeys
        );
        Ok(Self {
            config,
            choices,
            keys,
        })
    }

    /// Random-OLE choice bits: uniformly random inputs.
    pub fn random_choices<R: RngCore>(rng: &mut R, config: &RoleConfig) -> BitVector {
        BitVector::random(rng, config.total_ots() as usize)
    }

    /// Chosen-input choice bits: each `x_i` in `[0, 2^ℓ)` encoded as ℓ
    /// little-endian bits.
    pub fn encode_chosen_inputs(config: &RoleConfig, inputs: &[Fr]) -> Result<BitVector, OTError> {
        expect_equality!(
            inputs.len(),
            config.num_oles as usize,
            OTError::IncorrectNumberOfChosenValues
        );
        let bit_length = config.bit_length as usize;
        let mut choices = BitVector::new(config.total_ots() as usize);
        for (i, x) in inputs.iter().enumerate() {
            let bits = x.into_bigint().to_bits_le();
            if bits.iter().skip(bit_length).any(|b| *b) {
                return Err(OTError::ChosenValueOutOfRange(i as u32));
            }
            for (j, bit) in bits.into_iter().take(bit_length).enumerate() {
                choices.set(i * bit_length + j, bit);
            }
        }
        Ok(choices)
    }

    /// Round 2: open the chosen per-bit messages and fold them into
    /// `y_i = Σ_j m_{bit_{i,j}} = b_i + a_i·x_i`.
    pub fn round2(
        &self,
        encryptions: &[([u8; MESSAGE_LEN], [u8; MESSAGE_LEN])],
    ) -> Result<RoleReceiverPool, OTError> {
        let opened = decrypt_chosen(ROLE_OT_TAG, &self.keys, &self.choices, encryptions)?;
        let bit_length = self.config.bit_length as usize;
        let samples = (0..self.config.num_oles as usize)
            .map(|i| {
                let x = scalar_from_bits(&self.choices, i * bit_length, bit_length);
                let y = opened[i * bit_length..(i + 1) * bit_length]
                    .iter()
                    .map(|m| Fr::from_be_bytes_mod_order(m))
                    .sum();
                (x, y)
            })
            .collect();
        Ok(RoleReceiverPool {
            samples,
            next_index: 0,
        })
    }
}
