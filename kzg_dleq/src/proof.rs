//! Single-prover KZG-DLEQ: commit, divide out the claimed root, and prove
//! with a Schnorr DLEQ that the committed polynomial and the quotient
//! witness are consistent, i.e. that `p(x) = 0`.

use crate::{
    challenge::challenge_for_proof,
    error::KzgDleqError,
    polynomial::Polynomial,
    srs::scalar_powers,
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use vanish_utils::{
    curve::{affine_coords, base_field_to_be_bytes, generator, nonzero_scalar, Affine, Fr},
    ff::inner_product,
    nonce::{deterministic_nonce, NoncePart},
    serde_utils::ArkObjectBytes,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Proof that the polynomial committed in `C` evaluates to zero at `x`.
///
/// `C = p(s)·G`, `W = q(s)·G`, `P = s·G`, and `(A1, A2, z)` is a Schnorr
/// DLEQ transcript showing `log_G W = log_T C` for `T = P − x·G`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct DleqProof {
    #[serde_as(as = "ArkObjectBytes")]
    pub C: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub W: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub P: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub A1: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub A2: Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub x: Fr,
    #[serde_as(as = "ArkObjectBytes")]
    pub z: Fr,
}

/// Prover state between commitment and response. The witness is the scalar
/// `q(s)` (or its share-evaluated value), zeroized on drop.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DleqProver {
    witness: Fr,
    x: Fr,
    #[zeroize(skip)]
    C: Affine,
    #[zeroize(skip)]
    W: Affine,
    #[zeroize(skip)]
    P: Affine,
    #[zeroize(skip)]
    T: Affine,
}

impl DleqProver {
    /// Prover that knows the trusted-setup scalar `s` directly.
    pub fn new(poly: &Polynomial, x: Fr, s: &Fr) -> Result<Self, KzgDleqError> {
        if s.is_zero() || *s == x {
            return Err(KzgDleqError::DegenerateTrustedSetup);
        }
        let powers = scalar_powers(s, poly.degree());
        let P = (generator() * *s).into_affine();
        Self::new_with_share(poly, x, &powers, &P)
    }

    /// Prover holding a scalar power vector: either the full
    /// `[s^0, …, s^d]` or one node's additive share of it, together with
    /// the public point `P = s·G`. The share case is what each threshold
    /// node runs in Round 1.
    pub fn new_with_share(
        poly: &Polynomial,
        x: Fr,
        powers: &[Fr],
        P: &Affine,
    ) -> Result<Self, KzgDleqError> {
        if x.is_zero() {
            return Err(KzgDleqError::DegenerateTrustedSetup);
        }
        if poly.is_zero() {
            return Err(KzgDleqError::ZeroPolynomial);
        }
        if poly.coeffs().len() > powers.len() {
            return Err(KzgDleqError::DegreeExceedsSrs(
                poly.coeffs().len(),
                powers.len(),
            ));
        }
        let (q, remainder) = poly.divide_by_linear(&x);
        if !remainder.is_zero() {
            return Err(KzgDleqError::PolynomialNonZeroAtPoint);
        }
        let ps = inner_product(poly.coeffs(), powers);
        let witness = inner_product(q.coeffs(), powers);
        let T = (P.into_group() - generator() * x).into_affine();
        if T.is_zero() {
            return Err(KzgDleqError::DegenerateTrustedSetup);
        }
        Ok(Self {
            witness,
            x,
            C: (generator() * ps).into_affine(),
            W: (generator() * witness).into_affine(),
            P: *P,
            T,
        })
    }

    pub fn commitment(&self) -> &Affine {
        &self.C
    }

    pub fn witness_commitment(&self) -> &Affine {
        &self.W
    }

    /// Prove with a uniformly random nonce in [1, N).
    pub fn prove<R: RngCore>(self, rng: &mut R) -> Result<DleqProof, KzgDleqError> {
        let k = nonzero_scalar(rng);
        self.finish(k)
    }

    /// Prove with the deterministic nonce of the witness bound to the
    /// context `(x, Px, Py, Cx, Wx)`.
    pub fn prove_deterministic(self) -> Result<DleqProof, KzgDleqError> {
        let k = self.derive_nonce()?;
        self.finish(k)
    }

    pub(crate) fn derive_nonce(&self) -> Result<Fr, KzgDleqError> {
        let (px, py) = affine_coords(&self.P).ok_or(KzgDleqError::PointAtInfinity)?;
        let (cx, _) = affine_coords(&self.C).ok_or(KzgDleqError::PointAtInfinity)?;
        let (wx, _) = affine_coords(&self.W).ok_or(KzgDleqError::PointAtInfinity)?;
        Ok(deterministic_nonce(
            &self.witness,
            &[
                NoncePart::Scalar(self.x),
                NoncePart::Bytes(base_field_to_be_bytes(&px).to_vec()),
                NoncePart::Bytes(base_field_to_be_bytes(&py).to_vec()),
                NoncePart::Bytes(base_field_to_be_bytes(&cx).to_vec()),
                NoncePart::Bytes(base_field_to_be_bytes(&wx).to_vec()),
            ],
        ))
    }

    fn finish(self, k: Fr) -> Result<DleqProof, KzgDleqError> {
        let A1 = (generator() * k).into_affine();
        let A2 = (self.T * k).into_affine();
        let e = challenge_for_proof(&self.C, &self.W, &self.P, &A1, &A2, &self.x)?;
        let z = k + e * self.witness;
        Ok(DleqProof {
            C: self.C,
            W: self.W,
            P: self.P,
            A1,
            A2,
            x: self.x,
            z,
        })
    }
}

impl DleqProof {
    /// Check the proof: scalars nonzero, every point a real curve point
    /// (identity excluded), and the two Schnorr identities
    /// `A1 = z·G − e·W` and `A2 = z·T − e·C` under the recomputed
    /// challenge. Algebraic failure and malformed input both return false.
    pub fn verify(&self) -> bool {
        if self.x.is_zero() || self.z.is_zero() {
            return false;
        }
        if self.C.is_zero()
            || self.W.is_zero()
            || self.P.is_zero()
            || self.A1.is_zero()
            || self.A2.is_zero()
        {
            return false;
        }
        let T = self.P.into_group() - generator() * self.x;
        if T.is_zero() {
            return false;
        }
        let e = match challenge_for_proof(&self.C, &self.W, &self.P, &self.A1, &self.A2, &self.x) {
            Ok(e) => e,
            Err(_) => return false,
        };
        let lhs1 = generator() * self.z - self.W * e;
        let lhs2 = T * self.z - self.C * e;
        lhs1.into_affine() == self.A1 && lhs2.into_affine() == self.A2
    }
}
