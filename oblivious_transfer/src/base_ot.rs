//! 1-of-2 oblivious transfer from the paper
//! [The Simplest Protocol for Oblivious Transfer](https://eprint.iacr.org/2015/267)
//! instantiated on secp256k1. The sender holds a long-term secret `a` with
//! public `A = a·G`; the receiver sends `B = b·G` to pick the first message
//! or `B = A + b·G` to pick the second. Payloads are encrypted with
//! ChaCha20 under HKDF-Keccak derived keys and authenticated with a
//! detached Keccak-256 tag.

use crate::{error::OTError, Bit, Message};
use ark_ec::CurveGroup;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{ops::Neg, rand::RngCore, vec::Vec};
use chacha20::{
    cipher::{KeyIvInit, StreamCipher},
    ChaCha20,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use vanish_utils::{
    bits::ct_eq,
    concat_slices,
    curve::{ecdh, generator, nonzero_scalar, Affine, Fr, Projective},
    expect_equality,
    hashing::{hkdf_keccak256, keccak256},
    msm::WindowTable,
    serde_utils::ArkObjectBytes,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// HKDF info string for deriving the cipher and MAC keys from a shared
/// secret.
pub const OT_KEY_INFO: &[u8] = b"ot-key-derivation";

/// One encrypted OT branch: ChaCha20 ciphertext with a fresh 12-byte nonce
/// and a detached tag `Keccak256(mac_key ‖ nonce ‖ ciphertext)`.
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct OTCiphertext {
    pub nonce: [u8; 12],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; 32],
}

pub type CiphertextPair = (OTCiphertext, OTCiphertext);

/// Per-OT public keys sent by the receiver.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct ReceiverPubKeys(#[serde_as(as = "Vec<ArkObjectBytes>")] pub Vec<Affine>);

impl ReceiverPubKeys {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Sender's long-term OT parameters.
#[serde_as]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    Zeroize,
    ZeroizeOnDrop,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct OTSenderSetup {
    #[serde_as(as = "ArkObjectBytes")]
    a: Fr,
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub A: Affine,
}

/// Receiver state for a batch of OTs: the choice bits and the per-OT
/// blinding scalars, kept until the ciphertexts arrive.
#[serde_as]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    Zeroize,
    ZeroizeOnDrop,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct OTReceiver {
    #[zeroize(skip)]
    pub choices: Vec<Bit>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    b: Vec<Fr>,
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    A: Affine,
}

impl OTSenderSetup {
    pub fn new<R: RngCore>(rng: &mut R) -> Self {
        let a = nonzero_scalar(rng);
        Self {
            A: (generator() * a).into_affine(),
            a,
        }
    }

    /// Encrypt one message pair per receiver public key. For key `B` the
    /// two branch secrets are `ECDH(a, B)` and `ECDH(a, B − A)`; the
    /// receiver can compute exactly one of them.
    pub fn encrypt<R: RngCore>(
        &self,
        rng: &mut R,
        pubkeys: &ReceiverPubKeys,
        messages: Vec<(Message, Message)>,
    ) -> Result<Vec<CiphertextPair>, OTError> {
        expect_equality!(
            messages.len(),
            pubkeys.len(),
            OTError::IncorrectNumberOfMessagePairs
        );
        let neg_A = Projective::from(self.A).neg();
        let mut out = Vec::with_capacity(messages.len());
        for (i, ((m0, m1), B)) in messages.into_iter().zip(pubkeys.0.iter()).enumerate() {
            let s0 =
                ecdh(&self.a, B).ok_or(OTError::InvalidPublicKeyAtIndex(i as u32))?;
            let shifted = (Projective::from(*B) + neg_A).into_affine();
            let s1 =
                ecdh(&self.a, &shifted).ok_or(OTError::InvalidPublicKeyAtIndex(i as u32))?;
            out.push((
                seal(rng, &s0, m0),
                seal(rng, &s1, m1),
            ));
        }
        Ok(out)
    }
}

impl OTReceiver {
    /// Produce the per-OT public keys for a batch of choice bits against
    /// the sender's public `A`.
    pub fn new<R: RngCore>(
        rng: &mut R,
        choices: Vec<Bit>,
        A: &Affine,
    ) -> Result<(Self, ReceiverPubKeys), OTError> {
        if choices.is_empty() {
            return Err(OTError::NeedNonZeroNumberOfOTs);
        }
        let b = (0..choices.len())
            .map(|_| nonzero_scalar(rng))
            .collect::<Vec<_>>();
        let g_table = WindowTable::new(choices.len(), Projective::from(generator()));
        let keys = choices
            .iter()
            .zip(b.iter())
            .map(|(c, b)| {
                let bG = g_table.multiply(b);
                if *c {
                    Projective::from(*A) + bG
                } else {
                    bG
                }
            })
            .collect::<Vec<_>>();
        Ok((
            Self {
                choices,
                b,
                A: *A,
            },
            ReceiverPubKeys(Projective::normalize_batch(&keys)),
        ))
    }

    /// Open the chosen branch of each ciphertext pair. The tag is checked
    /// in constant time before any decryption.
    pub fn decrypt(&self, encryptions: Vec<CiphertextPair>) -> Result<Vec<Message>, OTError> {
        expect_equality!(
            encryptions.len(),
            self.choices.len(),
            OTError::IncorrectNumberOfCiphertexts
        );
        encryptions
            .into_iter()
            .enumerate()
            .map(|(i, (e0, e1))| {
                let shared = ecdh(&self.b[i], &self.A)
                    .ok_or(OTError::InvalidPublicKeyAtIndex(i as u32))?;
                let chosen = if self.choices[i] { e1 } else { e0 };
                open(&shared, chosen).ok_or(OTError::MacFailed(i as u32))
            })
            .collect()
    }
}

/// Split HKDF-Keccak output into the ChaCha20 key and the MAC key.
fn derive_branch_keys(shared: &[u8; 32]) -> ([u8; 32], [u8; 32]) {
    let mut okm = [0u8; 64];
    hkdf_keccak256(shared, OT_KEY_INFO, &mut okm);
    let mut cipher_key = [0u8; 32];
    let mut mac_key = [0u8; 32];
    cipher_key.copy_from_slice(&okm[..32]);
    mac_key.copy_from_slice(&okm[32..]);
    (cipher_key, mac_key)
}

fn seal<R: RngCore>(rng: &mut R, shared: &[u8; 32], message: Message) -> OTCiphertext {
    let (cipher_key, mac_key) = derive_branch_keys(shared);
    let mut nonce = [0u8; 12];
    rng.fill_bytes(&mut nonce);
    let mut ciphertext = message;
    ChaCha20::new(&cipher_key.into(), &nonce.into()).apply_keystream(&mut ciphertext);
    let tag = keccak256(&concat_slices!(mac_key, nonce, ciphertext));
    OTCiphertext {
        nonce,
        ciphertext,
        tag,
    }
}

fn open(shared: &[u8; 32], encrypted: OTCiphertext) -> Option<Message> {
    let (cipher_key, mac_key) = derive_branch_keys(shared);
    let expected = keccak256(&concat_slices!(
        mac_key,
        encrypted.nonce,
        encrypted.ciphertext
    ));
    if !ct_eq(&expected, &encrypted.tag) {
        return None;
    }
    let mut message = encrypted.ciphertext;
    ChaCha20::new(&cipher_key.into(), &encrypted.nonce.into()).apply_keystream(&mut message);
    Some(message)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        vec,
        UniformRand,
    };

    pub fn random_messages(rng: &mut StdRng, count: usize, size: usize) -> Vec<(Message, Message)> {
        (0..count)
            .map(|_| {
                let mut m0 = vec![0u8; size];
                let mut m1 = vec![0u8; size];
                rng.fill_bytes(&mut m0);
                rng.fill_bytes(&mut m1);
                (m0, m1)
            })
            .collect()
    }

    #[test]
    fn receiver_gets_exactly_the_chosen_message() {
        let mut rng = StdRng::seed_from_u64(0u64);
        for count in [1usize, 2, 8, 64] {
            let sender = OTSenderSetup::new(&mut rng);
            let choices = (0..count).map(|_| u8::rand(&mut rng) % 2 != 0).collect::<Vec<_>>();
            let (receiver, pubkeys) =
                OTReceiver::new(&mut rng, choices.clone(), &sender.A).unwrap();
            let messages = random_messages(&mut rng, count, 32);
            let encryptions = sender
                .encrypt(&mut rng, &pubkeys, messages.clone())
                .unwrap();
            let decrypted = receiver.decrypt(encryptions).unwrap();
            for i in 0..count {
                let expected = if choices[i] { &messages[i].1 } else { &messages[i].0 };
                assert_eq!(&decrypted[i], expected);
            }
        }
    }

    #[test]
    fn variable_length_messages() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let sender = OTSenderSetup::new(&mut rng);
        let (receiver, pubkeys) =
            OTReceiver::new(&mut rng, vec![true, false], &sender.A).unwrap();
        let messages = vec![
            (vec![1u8; 5], vec![2u8; 5]),
            (vec![3u8; 100], vec![4u8; 100]),
        ];
        let encryptions = sender.encrypt(&mut rng, &pubkeys, messages).unwrap();
        let decrypted = receiver.decrypt(encryptions).unwrap();
        assert_eq!(decrypted[0], vec![2u8; 5]);
        assert_eq!(decrypted[1], vec![3u8; 100]);
    }

    #[test]
    fn tampered_ciphertext_fails_mac() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let sender = OTSenderSetup::new(&mut rng);
        let (receiver, pubkeys) = OTReceiver::new(&mut rng, vec![false], &sender.A).unwrap();
        let messages = random_messages(&mut rng, 1, 32);
        let mut encryptions = sender.encrypt(&mut rng, &pubkeys, messages).unwrap();
        encryptions[0].0.ciphertext[0] ^= 1;
        assert_eq!(
            receiver.decrypt(encryptions).err(),
            Some(OTError::MacFailed(0))
        );
    }

    #[test]
    fn mismatched_batch_sizes_are_rejected() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let sender = OTSenderSetup::new(&mut rng);
        let (receiver, pubkeys) =
            OTReceiver::new(&mut rng, vec![false, true], &sender.A).unwrap();
        let messages = random_messages(&mut rng, 1, 32);
        assert_eq!(
            sender.encrypt(&mut rng, &pubkeys, messages.clone()).err(),
            Some(OTError::IncorrectNumberOfMessagePairs(1, 2))
        );
        let messages = random_messages(&mut rng, 2, 32);
        let mut encryptions = sender.encrypt(&mut rng, &pubkeys, messages).unwrap();
        encryptions.pop();
        assert_eq!(
            receiver.decrypt(encryptions).err(),
            Some(OTError::IncorrectNumberOfCiphertexts(1, 2))
        );
    }

    #[test]
    fn identity_public_key_is_rejected() {
        use ark_ec::AffineRepr;
        let mut rng = StdRng::seed_from_u64(4u64);
        let sender = OTSenderSetup::new(&mut rng);
        let pubkeys = ReceiverPubKeys(vec![Affine::zero()]);
        let messages = random_messages(&mut rng, 1, 32);
        assert_eq!(
            sender.encrypt(&mut rng, &pubkeys, messages).err(),
            Some(OTError::InvalidPublicKeyAtIndex(0))
        );
    }
}
