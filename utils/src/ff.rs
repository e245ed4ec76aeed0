use ark_ff::PrimeField;
use ark_std::cfg_into_iter;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Inner product of two scalar slices, over the shorter length.
pub fn inner_product<F: PrimeField>(a: &[F], b: &[F]) -> F {
    let size = a.len().min(b.len());

    #[cfg(feature = "parallel")]
    let sum = cfg_into_iter!(0..size)
        .map(|i| a[i] * b[i])
        .reduce(F::zero, |accum, v| accum + v);

    #[cfg(not(feature = "parallel"))]
    let sum = cfg_into_iter!(0..size)
        .map(|i| a[i] * b[i])
        .fold(F::zero(), |accum, v| accum + v);

    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Fr;

    #[test]
    fn inner_product_truncates_to_shorter() {
        let a = [Fr::from(2u64), Fr::from(3u64), Fr::from(5u64)];
        let b = [Fr::from(7u64), Fr::from(11u64)];
        assert_eq!(inner_product(&a, &b), Fr::from(14u64 + 33));
    }
}
