//! Two-round interactive threshold prover. Round 1 commits every node to
//! its additive contribution; aggregation is a barrier that fixes the
//! Fiat-Shamir challenge; Round 2 releases response shares only after each
//! node has recomputed the challenge from the aggregated points itself.

use crate::{error::ThresholdError, srs_sharing::SrsShareVector};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_iter, vec::Vec};
use kzg_dleq::{challenge_for_proof, DleqProof, KzgDleqError, Polynomial};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use vanish_utils::{
    curve::{affine_coords, base_field_to_be_bytes, generator, Affine, Fr, Projective},
    ff::inner_product,
    nonce::{deterministic_nonce, NoncePart},
    serde_utils::ArkObjectBytes,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A node's Round 1 broadcast: its share of the commitment, witness and
/// the two Schnorr commitment points.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Round1Message {
    #[serde_as(as = "ArkObjectBytes")]
    pub C: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub W: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub A1: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub A2: Affine,
}

/// A node's Round 1 secrets: the nonce and witness share, plus the
/// statement it committed to. Zeroized on drop; releasing two responses
/// from one state with different challenges leaks the witness share.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Round1State {
    k: Fr,
    w_share: Fr,
    #[zeroize(skip)]
    x: Fr,
    #[zeroize(skip)]
    P: Affine,
}

/// Round 1 for one node: evaluate the share inner products, derive the
/// deterministic nonce bound to `(x, Px, Py, Cx, Wx)`, and commit.
pub fn round1(
    share: &SrsShareVector,
    poly: &Polynomial,
    x: Fr,
    P: &Affine,
) -> Result<(Round1State, Round1Message), ThresholdError> {
    if x.is_zero() {
        return Err(KzgDleqError::DegenerateTrustedSetup.into());
    }
    if poly.is_zero() {
        return Err(KzgDleqError::ZeroPolynomial.into());
    }
    if poly.coeffs().len() > share.len() {
        return Err(KzgDleqError::DegreeExceedsSrs(poly.coeffs().len(), share.len()).into());
    }
    let (q, remainder) = poly.divide_by_linear(&x);
    if !remainder.is_zero() {
        return Err(KzgDleqError::PolynomialNonZeroAtPoint.into());
    }
    let T = (P.into_group() - generator() * x).into_affine();
    if T.is_zero() {
        return Err(KzgDleqError::DegenerateTrustedSetup.into());
    }

    let ps_share = inner_product(poly.coeffs(), share.as_slice());
    let w_share = inner_product(q.coeffs(), share.as_slice());
    let C = (generator() * ps_share).into_affine();
    let W = (generator() * w_share).into_affine();

    let (px, py) = affine_coords(P).ok_or(KzgDleqError::PointAtInfinity)?;
    let (cx, _) = affine_coords(&C).ok_or(KzgDleqError::PointAtInfinity)?;
    let (wx, _) = affine_coords(&W).ok_or(KzgDleqError::PointAtInfinity)?;
    let k = deterministic_nonce(
        &w_share,
        &[
            NoncePart::Scalar(x),
            NoncePart::Bytes(base_field_to_be_bytes(&px).to_vec()),
            NoncePart::Bytes(base_field_to_be_bytes(&py).to_vec()),
            NoncePart::Bytes(base_field_to_be_bytes(&cx).to_vec()),
            NoncePart::Bytes(base_field_to_be_bytes(&wx).to_vec()),
        ],
    );

    let A1 = (generator() * k).into_affine();
    let A2 = (T * k).into_affine();
    Ok((
        Round1State {
            k,
            w_share,
            x,
            P: *P,
        },
        Round1Message { C, W, A1, A2 },
    ))
}

/// Round 1 for every node at once. The shares are independent, so the
/// nodes fan out in parallel under the `parallel` feature; ordering is
/// irrelevant because the aggregation sums commute.
pub fn round1_all(
    shares: &[SrsShareVector],
    poly: &Polynomial,
    x: Fr,
    P: &Affine,
) -> Result<Vec<(Round1State, Round1Message)>, ThresholdError> {
    cfg_iter!(shares)
        .map(|share| round1(share, poly, x, P))
        .collect()
}

/// Aggregated Round 1 points. Point sums commute, so the aggregator may
/// collect the node messages in any order, but all of them must be present
/// before the challenge exists.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Aggregated {
    #[serde_as(as = "ArkObjectBytes")]
    pub C: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub W: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub A1: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub A2: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub P: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub x: Fr,
}

impl Aggregated {
    pub fn new(
        messages: &[Round1Message],
        P: &Affine,
        x: Fr,
    ) -> Result<Self, ThresholdError> {
        if messages.is_empty() {
            return Err(ThresholdError::NoNodes);
        }
        let mut C = Projective::zero();
        let mut W = Projective::zero();
        let mut A1 = Projective::zero();
        let mut A2 = Projective::zero();
        for m in messages {
            C += m.C;
            W += m.W;
            A1 += m.A1;
            A2 += m.A2;
        }
        Ok(Self {
            C: C.into_affine(),
            W: W.into_affine(),
            A1: A1.into_affine(),
            A2: A2.into_affine(),
            P: *P,
            x,
        })
    }

    /// The Fiat-Shamir challenge of the aggregated transcript.
    pub fn challenge(&self) -> Result<Fr, ThresholdError> {
        Ok(challenge_for_proof(
            &self.C, &self.W, &self.P, &self.A1, &self.A2, &self.x,
        )?)
    }
}

impl Round1State {
    pub(crate) fn witness_share(&self) -> Fr {
        self.w_share
    }

    pub(crate) fn nonce(&self) -> Fr {
        self.k
    }

    /// Round 2: recompute the challenge from the aggregated points and
    /// refuse to respond when it differs from the aggregator's claim.
    pub fn round2(
        self,
        aggregated: &Aggregated,
        aggregator_challenge: &Fr,
    ) -> Result<Fr, ThresholdError> {
        if aggregated.P != self.P || aggregated.x != self.x {
            return Err(ThresholdError::StatementMismatch);
        }
        let e = aggregated.challenge()?;
        if e != *aggregator_challenge {
            return Err(ThresholdError::ChallengeMismatch);
        }
        Ok(self.k + e * self.w_share)
    }
}

/// Sum the response shares into the final proof.
pub fn finalize(
    aggregated: &Aggregated,
    responses: &[Fr],
    num_nodes: usize,
) -> Result<DleqProof, ThresholdError> {
    if responses.is_empty() {
        return Err(ThresholdError::NoNodes);
    }
    if responses.len() != num_nodes {
        return Err(ThresholdError::IncorrectNumberOfResponses(
            responses.len(),
            num_nodes,
        ));
    }
    let z = responses.iter().sum();
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
