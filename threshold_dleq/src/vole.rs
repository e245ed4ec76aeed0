//! Single-round VOLE-masked prover. Each node offsets its witness share
//! and nonce by a fresh OLE sample, `Δw = w − a` and `Δk = k − b`, and
//! sends everything in one message. Once the aggregator knows the
//! challenge it evaluates the same sample at `x = e` on the receiver side
//! and reconstructs `z_i = y_i + e·Δw_i + Δk_i = e·w_i + k_i` without any
//! second round. A sample must never serve two different challenges:
//! reuse lets the aggregator solve for `(a_i, b_i)` and then `(w_i, k_i)`.

use crate::{
    error::ThresholdError,
    interactive::{Aggregated, Round1Message, Round1State},
    srs_sharing::SrsShareVector,
};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{collections::BTreeSet, vec::Vec};
use kzg_dleq::{DleqProof, Polynomial};
use oblivious_transfer::role::{RoleReceiverSample, RoleSenderSample};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use vanish_utils::{
    curve::{Affine, Fr},
    serde_utils::ArkObjectBytes,
};

/// The single message a node sends: its Round 1 points plus the masked
/// witness and nonce offsets and the OLE index they are masked under.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct VoleNodeMessage {
    pub round1: Round1Message,
    #[serde_as(as = "ArkObjectBytes")]
    pub delta_w: Fr,
    #[serde_as(as = "ArkObjectBytes")]
    pub delta_k: Fr,
    pub ole_index: u32,
}

impl Round1State {
    /// Mask this node's secrets under a fresh sender-side OLE sample,
    /// consuming both. The round state cannot be reused afterwards, which
    /// is exactly the single-use discipline the masking needs.
    pub fn into_vole_message(
        self,
        round1: Round1Message,
        sample: &RoleSenderSample,
    ) -> VoleNodeMessage {
        VoleNodeMessage {
            round1,
            delta_w: self.witness_share() - sample.a,
            delta_k: self.nonce() - sample.b,
            ole_index: sample.index,
        }
    }
}

/// One-shot node step: Round 1 plus masking, producing the single message.
pub fn vole_round(
    share: &SrsShareVector,
    poly: &Polynomial,
    x: Fr,
    P: &Affine,
    sample: &RoleSenderSample,
) -> Result<VoleNodeMessage, ThresholdError> {
    let (state, message) = crate::interactive::round1(share, poly, x, P)?;
    Ok(state.into_vole_message(message, sample))
}

/// Aggregate the node messages into a proof. `samples` are the
/// receiver-side OLE outputs, one per node message; each must carry the
/// matching index and must have been evaluated exactly at the challenge.
pub fn vole_finalize(
    messages: &[VoleNodeMessage],
    samples: &[RoleReceiverSample],
    P: &Affine,
    x: Fr,
) -> Result<DleqProof, ThresholdError> {
    if messages.is_empty() {
        return Err(ThresholdError::NoNodes);
    }
    if samples.len() != messages.len() {
        return Err(ThresholdError::IncorrectNumberOfOleSamples(
            samples.len(),
            messages.len(),
        ));
    }
    let round1 = messages.iter().map(|m| m.round1.clone()).collect::<Vec<_>>();
    let aggregated = Aggregated::new(&round1, P, x)?;
    let e = aggregated.challenge()?;

    let mut seen = BTreeSet::new();
    let mut z = Fr::zero();
    for (message, sample) in messages.iter().zip(samples.iter()) {
        if !seen.insert(message.ole_index) {
            return Err(ThresholdError::DuplicateOleIndex(message.ole_index));
        }
        if sample.index != message.ole_index {
            return Err(ThresholdError::OleIndexMismatch(
                sample.index,
                message.ole_index,
            ));
        }
        if sample.x != e {
            return Err(ThresholdError::WrongOleEvaluationPoint(sample.index));
        }
        // y + e·Δw + Δk = (a·e + b) + e·(w − a) + (k − b) = e·w + k
        z += sample.y + e * message.delta_w + message.delta_k;
    }
    Ok(DleqProof {
        C: aggregated.C,
        W: aggregated.W,
        P: aggregated.P,
        A1: aggregated.A1,
        A2: aggregated.A2,
        x: aggregated.x,
        z,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        interactive::{finalize, round1, tests::polynomial_with_root, Aggregated},
        srs_sharing::share_srs,
    };
    use ark_ec::CurveGroup;
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        vec,
        UniformRand,
    };
    use kzg_dleq::evm::encode_verify_calldata;
    use oblivious_transfer::{
        base_ot::OTSenderSetup,
        iknp::{ExtensionReceiver, ExtensionSender},
        role::{RoleConfig, RoleReceiver, RoleReceiverPool, RoleSender, RoleSenderPool},
    };
    use vanish_utils::curve::generator;

    /// In-process ROLE pipeline with the aggregator's chosen inputs.
    fn run_role(
        rng: &mut StdRng,
        config: RoleConfig,
        inputs: &[Fr],
    ) -> (RoleSenderPool, RoleReceiverPool) {
        let iknp = config.iknp_config().unwrap();
        let choices = RoleReceiver::encode_chosen_inputs(&config, inputs).unwrap();

        let base = OTSenderSetup::new(rng);
        let ext_receiver = ExtensionReceiver::new(rng, iknp, Some(choices.clone())).unwrap();
        let (ext_sender, base_pubkeys) = ExtensionSender::new(rng, iknp, &base.A).unwrap();
        let encryptions = ext_receiver.transfer(rng, &base, &base_pubkeys).unwrap();
        let sender_keys = ext_sender.derive_keys(encryptions).unwrap();
        let receiver_keys = ext_receiver.derive_keys();

        let role_sender = RoleSender::new(config, sender_keys).unwrap();
        let role_receiver = RoleReceiver::new(config, choices, receiver_keys).unwrap();
        let (sender_pool, role_encryptions) = role_sender.round2().unwrap();
        let receiver_pool = role_receiver.round2(&role_encryptions).unwrap();
        (sender_pool, receiver_pool)
    }

    struct VoleFixture {
        proof: DleqProof,
        interactive_proof: DleqProof,
    }

    /// Full pipeline: Round 1 points fix the challenge, the OLE pool is
    /// evaluated at it, and the masked messages are finalized.
    fn run_vole(rng: &mut StdRng, num_nodes: usize, poly_len: usize, x: Fr) -> VoleFixture {
        let s = Fr::rand(rng);
        let poly = polynomial_with_root(rng, poly_len, &x);
        let shares = share_srs(rng, &s, poly_len - 1, num_nodes).unwrap();
        let P = (generator() * s).into_affine();

        let (states, round1_messages): (Vec<_>, Vec<_>) = shares
            .iter()
            .map(|share| round1(share, &poly, x, &P).unwrap())
            .unzip();
        let aggregated = Aggregated::new(&round1_messages, &P, x).unwrap();
        let e = aggregated.challenge().unwrap();

        // the aggregator evaluates one OLE per node at the challenge
        let config = RoleConfig::new(num_nodes as u32, 256, 128).unwrap();
        let inputs = vec![e; num_nodes];
        let (mut sender_pool, mut receiver_pool) = run_role(rng, config, &inputs);

        let messages = states
            .into_iter()
            .zip(round1_messages.iter())
            .map(|(state, message)| {
                let sample = sender_pool.take_next().unwrap();
                state.into_vole_message(message.clone(), &sample)
            })
            .collect::<Vec<_>>();
        let samples = (0..num_nodes)
            .map(|_| receiver_pool.take_next().unwrap())
            .collect::<Vec<_>>();
        let proof = vole_finalize(&messages, &samples, &P, x).unwrap();

        // reference: the interactive protocol over the same shares
        let responses = shares
            .iter()
            .map(|share| {
                let (state, _) = round1(share, &poly, x, &P).unwrap();
                state.round2(&aggregated, &e).unwrap()
            })
            .collect::<Vec<_>>();
        let interactive_proof = finalize(&aggregated, &responses, num_nodes).unwrap();
        VoleFixture {
            proof,
            interactive_proof,
        }
    }

    #[test]
    fn vole_proof_verifies_and_matches_interactive() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let fixture = run_vole(&mut rng, 4, 100, Fr::from(42u64));
        assert!(fixture.proof.verify());
        assert_eq!(fixture.proof, fixture.interactive_proof);
        // byte-exact under the calldata encoder too
        assert_eq!(
            encode_verify_calldata(&fixture.proof).unwrap(),
            encode_verify_calldata(&fixture.interactive_proof).unwrap()
        );
    }

    #[test]
    fn duplicate_ole_index_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let s = Fr::rand(&mut rng);
        let x = Fr::from(7u64);
        let poly = polynomial_with_root(&mut rng, 6, &x);
        let shares = share_srs(&mut rng, &s, 5, 2).unwrap();
        let P = (generator() * s).into_affine();

        let (states, round1_messages): (Vec<_>, Vec<_>) = shares
            .iter()
            .map(|share| round1(share, &poly, x, &P).unwrap())
            .unzip();
        let aggregated = Aggregated::new(&round1_messages, &P, x).unwrap();
        let e = aggregated.challenge().unwrap();
        let config = RoleConfig::new(2, 256, 128).unwrap();
        let (mut sender_pool, mut receiver_pool) =
            run_role(&mut rng, config, &vec![e; 2]);

        let sample = sender_pool.take_next().unwrap();
        let mut messages = states
            .into_iter()
            .zip(round1_messages.iter())
            .map(|(state, message)| state.into_vole_message(message.clone(), &sample))
            .collect::<Vec<_>>();
        let samples = vec![
            receiver_pool.take_next().unwrap(),
            receiver_pool.take_next().unwrap(),
        ];
        assert!(matches!(
            vole_finalize(&messages, &samples, &P, x),
            Err(ThresholdError::DuplicateOleIndex(0))
        ));

        // distinct but mismatched indices are also rejected
        messages[1].ole_index = 5;
        assert!(matches!(
            vole_finalize(&messages, &samples, &P, x),
            Err(ThresholdError::OleIndexMismatch(1, 5))
        ));
    }

    #[test]
    fn sample_evaluated_at_wrong_point_is_rejected() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let s = Fr::rand(&mut rng);
        let x = Fr::from(7u64);
        let poly = polynomial_with_root(&mut rng, 6, &x);
        let shares = share_srs(&mut rng, &s, 5, 1).unwrap();
        let P = (generator() * s).into_affine();

        let (state, message) = round1(&shares[0], &poly, x, &P).unwrap();
        let config = RoleConfig::new(1, 256, 128).unwrap();
        // pool evaluated at a random point instead of the challenge
        let wrong = Fr::rand(&mut rng);
        let (mut sender_pool, mut receiver_pool) =
            run_role(&mut rng, config, &vec![wrong]);
        let messages = vec![state.into_vole_message(message, &sender_pool.take_next().unwrap())];
        let samples = vec![receiver_pool.take_next().unwrap()];
        assert!(matches!(
            vole_finalize(&messages, &samples, &P, x),
            Err(ThresholdError::WrongOleEvaluationPoint(0))
        ));
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let s = Fr::rand(&mut rng);
        let x = Fr::from(7u64);
        let poly = polynomial_with_root(&mut rng, 4, &x);
        let shares = share_srs(&mut rng, &s, 3, 1).unwrap();
        let P = (generator() * s).into_affine();
        let (state, message) = round1(&shares[0], &poly, x, &P).unwrap();
        let sample = RoleSenderSample {
            index: 0,
            a: Fr::rand(&mut rng),
            b: Fr::rand(&mut rng),
        };
        let messages = vec![state.into_vole_message(message, &sample)];
        assert!(matches!(
            vole_finalize(&messages, &[], &P, x),
            Err(ThresholdError::IncorrectNumberOfOleSamples(0, 1))
        ));
        assert!(matches!(
            vole_finalize(&[], &[], &P, x),
            Err(ThresholdError::NoNodes)
        ));
    }
}
