//! Additive sharing of the trusted-setup power vector. Column-wise the
//! share vectors of all nodes sum to `[s^0, …, s^d]`, so inner products
//! against polynomial coefficients are additively shared too.

use crate::error::ThresholdError;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec::Vec};
use kzg_dleq::srs::share_scalar_powers;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use vanish_utils::{curve::Fr, serde_utils::ArkObjectBytes};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One node's additive share of the power vector. Secret: leaking enough
/// share vectors reconstructs the powers of `s`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop, CanonicalSerialize, CanonicalDeserialize,
    Serialize, Deserialize,
)]
pub struct SrsShareVector(#[serde_as(as = "Vec<ArkObjectBytes>")] pub Vec<Fr>);

impl SrsShareVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Fr] {
        &self.0
    }
}

/// Deal share vectors for `num_nodes` nodes supporting polynomials up to
/// `degree`. The first `num_nodes − 1` vectors are uniform; the last is
/// the column-wise complement.
pub fn share_srs<R: RngCore>(
    rng: &mut R,
    s: &Fr,
    degree: usize,
    num_nodes: usize,
) -> Result<Vec<SrsShareVector>, ThresholdError> {
    let shares = share_scalar_powers(rng, s, degree, num_nodes)?;
    Ok(shares.into_iter().map(SrsShareVector).collect())
}
