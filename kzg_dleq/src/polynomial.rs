//! Univariate polynomials over the scalar field, stored as ascending
//! coefficient vectors. Only evaluation and division by a linear factor are
//! needed here; there is deliberately no interpolation or FFT machinery.

use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use vanish_utils::{curve::Fr, serde_utils::ArkObjectBytes};

/// Coefficients in ascending degree order: `p(X) = Σ_i coeffs[i]·X^i`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Polynomial(#[serde_as(as = "Vec<ArkObjectBytes>")] pub Vec<Fr>);

impl Polynomial {
    pub fn new(coeffs: Vec<Fr>) -> Self {
        Self(coeffs)
    }

    pub fn coeffs(&self) -> &[Fr] {
        &self.0
    }

    pub fn degree(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Fr::is_zero)
    }

    /// Horner evaluation.
    pub fn evaluate(&self, x: &Fr) -> Fr {
        self.0
            .iter()
            .rev()
            .fold(Fr::zero(), |acc, c| acc * x + c)
    }

    /// Synthetic division by `(X − x)`: returns the quotient `q` of length
    /// `degree` and the remainder, which equals `p(x)`. In ascending form:
    /// `b[d] = c[d]`, `b[i] = c[i] + x·b[i+1]`, remainder `b[0]`,
    /// `q = [b[1], …, b[d]]`.
    pub fn divide_by_linear(&self, x: &Fr) -> (Polynomial, Fr) {
        let d = self.degree();
        if self.0.is_empty() || d == 0 {
            let remainder = self.0.first().copied().unwrap_or_else(Fr::zero);
            return (Polynomial::new(Vec::new()), remainder);
        }
        let mut b = self.0.clone();
        for i in (0..d).rev() {
            let next = b[i + 1];
            b[i] += *x * next;
        }
        let remainder = b[0];
        b.remove(0);
        (Polynomial::new(b), remainder)
    }
}
