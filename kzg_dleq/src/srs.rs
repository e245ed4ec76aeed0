//! Powers-of-s reference string: `[G, s·G, …, s^d·G]`. The scalar `s` is
//! the trusted-setup secret; only the points are published.

use crate::{error::KzgDleqError, polynomial::Polynomial};
use ark_ec::{CurveGroup, VariableBaseMSM};
use ark_ff::{Field, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec, vec::Vec, UniformRand};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use vanish_utils::{
    curve::{generator, Affine, Fr, Projective},
    msm::WindowTable,
    serde_utils::ArkObjectBytes,
};

/// `[s^0, s^1, …, s^degree]`.
pub fn scalar_powers(s: &Fr, degree: usize) -> Vec<Fr> {
    let mut powers = Vec::with_capacity(degree + 1);
    powers.push(Fr::ONE);
    for i in 1..=degree {
        let prev = powers[i - 1];
        powers.push(prev * s);
    }
    powers
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Srs {
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub powers: Vec<Affine>,
}

impl Srs {
    /// Generate the reference string for polynomials up to `degree`.
    /// `s = 0` makes every power past the first the identity and is
    /// rejected, as is a zero-length string.
    pub fn new(s: &Fr, degree: usize) -> Result<Self, KzgDleqError> {
        if s.is_zero() || degree == 0 {
            return Err(KzgDleqError::DegenerateTrustedSetup);
        }
        let table = WindowTable::new(degree + 1, Projective::from(generator()));
        let powers = Projective::normalize_batch(&table.multiply_many(&scalar_powers(s, degree)));
        Ok(Self { powers })
    }

    /// Largest polynomial degree this string supports.
    pub fn degree(&self) -> usize {
        self.powers.len() - 1
    }

    /// The trusted-setup public point `P = s·G`.
    pub fn public_point(&self) -> &Affine {
        &self.powers[1]
    }

    /// `Σ_i c_i · s^i·G`, skipping zero coefficients. Rejects the zero
    /// polynomial and polynomials longer than the string.
    pub fn commit(&self, poly: &Polynomial) -> Result<Affine, KzgDleqError> {
        if poly.coeffs().len() > self.powers.len() {
            return Err(KzgDleqError::DegreeExceedsSrs(
                poly.coeffs().len(),
                self.powers.len(),
            ));
        }
        if poly.is_zero() {
            return Err(KzgDleqError::ZeroPolynomial);
        }
        let mut bases = Vec::with_capacity(poly.coeffs().len());
        let mut scalars = Vec::with_capacity(poly.coeffs().len());
        for (c, p) in poly.coeffs().iter().zip(self.powers.iter()) {
            if !c.is_zero() {
                bases.push(*p);
                scalars.push(*c);
            }
        }
        Ok(Projective::msm_unchecked(&bases, &scalars).into_affine())
    }
}

/// Additive sharing of the scalar powers `[s^0, …, s^d]` across `n` nodes:
/// column-wise, the share vectors sum to the power vector. Each node can
/// then evaluate inner products against polynomial coefficients without any
/// party holding `s`.
pub fn share_scalar_powers<R: RngCore>(
    rng: &mut R,
    s: &Fr,
    degree: usize,
    num_nodes: usize,
) -> Result<Vec<Vec<Fr>>, KzgDleqError> {
    if s.is_zero() || num_nodes == 0 {
        return Err(KzgDleqError::DegenerateTrustedSetup);
    }
    let powers = scalar_powers(s, degree);
    let mut shares = vec![vec![Fr::zero(); degree + 1]; num_nodes];
    for k in 0..=degree {
        let mut acc = Fr::zero();
        for share in shares.iter_mut().take(num_nodes - 1) {
            let r = Fr::rand(rng);
            share[k] = r;
            acc += r;
        }
        shares[num_nodes - 1][k] = powers[k] - acc;
    }
    Ok(shares)
}
