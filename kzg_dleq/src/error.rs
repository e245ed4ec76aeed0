use ark_serialize::SerializationError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum KzgDleqError {
    /// `p(x) ≠ 0` at the requested evaluation point
    PolynomialNonZeroAtPoint,
    /// Polynomial has more coefficients than the SRS has powers
    DegreeExceedsSrs(usize, usize),
    /// `s = 0`, `s = x` (the base `T` would be the identity), or the
    /// evaluation point is zero
    DegenerateTrustedSetup,
    /// Commitment to the zero polynomial
    ZeroPolynomial,
    /// A point that must have coordinates is the point at infinity
    PointAtInfinity,
    #[serde(skip)]
    Serialization(SerializationError),
}

impl From<SerializationError> for KzgDleqError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
