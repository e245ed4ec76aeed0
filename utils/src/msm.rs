use crate::curve::{Affine, Fr, Projective};
use ark_ec::scalar_mul::fixed_base::FixedBase;
use ark_ff::PrimeField;
use ark_std::vec::Vec;

/// Use when the same point is to be multiplied by several scalars.
#[derive(Clone, Debug)]
pub struct WindowTable {
    scalar_size: usize,
    window_size: usize,
    outerc: usize,
    table: Vec<Vec<Affine>>,
}

impl WindowTable {
    /// Build a table for `group_elem`. `num_multiplications` is how many
    /// multiplications will be done with it; an approximation only affects
    /// performance, not correctness.
    pub fn new(num_multiplications: usize, group_elem: Projective) -> Self {
        let scalar_size = Fr::MODULUS_BIT_SIZE as usize;
        let window_size = FixedBase::get_mul_window_size(num_multiplications);
        let outerc = (scalar_size + window_size - 1) / window_size;
        let table = FixedBase::get_window_table(scalar_size, window_size, group_elem);
        Self {
            scalar_size,
            window_size,
            outerc,
            table,
        }
    }

    pub fn multiply(&self, element: &Fr) -> Projective {
        FixedBase::windowed_mul(self.outerc, self.window_size, &self.table, element)
    }

    pub fn multiply_many(&self, elements: &[Fr]) -> Vec<Projective> {
        FixedBase::msm(self.scalar_size, self.window_size, &self.table, elements)
    }
}
