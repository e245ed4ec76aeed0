//! Densely packed bit containers. Bit `i` of a vector lives in byte `i / 8`
//! at position `i mod 8` (LSB first), the layout the OT extension's packed
//! column XORs and matrix transpose operate on directly.

use crate::{curve::Fr, hashing::hkdf_keccak256_blocks};
use ark_ff::PrimeField;
use ark_std::{rand::RngCore, vec, vec::Vec};
use serde::{Deserialize, Serialize};

#[inline]
pub fn divide_by_8(n: usize) -> usize {
    n >> 3
}

#[inline]
pub fn modulo_8(n: usize) -> usize {
    n & 7
}

#[inline]
pub fn is_multiple_of_8(n: usize) -> bool {
    modulo_8(n) == 0
}

#[inline]
pub fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b.iter()).map(|(a, b)| a ^ b).collect()
}

#[inline]
pub fn xor_in_place(a: &mut [u8], b: &[u8]) {
    for (a, b) in a.iter_mut().zip(b.iter()) {
        *a ^= b;
    }
}

/// Equality of byte strings without early exit. The accumulated difference
/// is folded over every byte so the comparison time is independent of where
/// the first mismatch sits.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (a, b) in a.iter().zip(b.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}

#[inline]
fn get_bit(bytes: &[u8], i: usize) -> bool {
    bytes[divide_by_8(i)] >> modulo_8(i) & 1 == 1
}

#[inline]
fn set_bit(bytes: &mut [u8], i: usize, b: bool) {
    if b {
        bytes[divide_by_8(i)] |= 1 << modulo_8(i);
    } else {
        bytes[divide_by_8(i)] &= !(1 << modulo_8(i));
    }
}

pub fn boolvec_to_u8vec(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; divide_by_8(bits.len()) + usize::from(!is_multiple_of_8(bits.len()))];
    for (i, b) in bits.iter().enumerate() {
        bytes[divide_by_8(i)] |= (*b as u8) << modulo_8(i);
    }
    bytes
}

pub fn u8vec_to_boolvec(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for i in 0..8 {
            bits.push(byte >> i & 1 == 1);
        }
    }
    bits
}

/// A packed bit vector of fixed length.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitVector {
    len: usize,
    bytes: Vec<u8>,
}

impl BitVector {
    /// All-zero vector of `len` bits.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            bytes: vec![0u8; divide_by_8(len) + usize::from(!is_multiple_of_8(len))],
        }
    }

    /// Vector over an explicit backing buffer, which must be exactly
    /// ⌈len/8⌉ bytes. Bits past `len` in the final byte must be zero for
    /// equality and XOR to behave; `from_bytes` masks them off.
    pub fn from_bytes(mut bytes: Vec<u8>, len: usize) -> Option<Self> {
        let expected = divide_by_8(len) + usize::from(!is_multiple_of_8(len));
        if bytes.len() != expected {
            return None;
        }
        if !is_multiple_of_8(len) {
            let last = bytes.len() - 1;
            bytes[last] &= (1u8 << modulo_8(len)) - 1;
        }
        Some(Self { len, bytes })
    }

    /// `len` uniformly random bits.
    pub fn random<R: RngCore>(rng: &mut R, len: usize) -> Self {
        let mut v = Self::new(len);
        rng.fill_bytes(&mut v.bytes);
        if !is_multiple_of_8(len) {
            let last = v.bytes.len() - 1;
            v.bytes[last] &= (1u8 << modulo_8(len)) - 1;
        }
        v
    }

    pub fn from_bools(bits: &[bool]) -> Self {
        Self {
            len: bits.len(),
            bytes: boolvec_to_u8vec(bits),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.len);
        get_bit(&self.bytes, i)
    }

    pub fn set(&mut self, i: usize, b: bool) {
        assert!(i < self.len);
        set_bit(&mut self.bytes, i, b);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.len).map(|i| get_bit(&self.bytes, i)).collect()
    }

    pub fn xor_with(&mut self, other: &BitVector) {
        assert_eq!(self.len, other.len);
        xor_in_place(&mut self.bytes, &other.bytes);
    }
}

/// Little-endian bit decomposition over a window of a bit vector:
/// `x = Σ_j bit[offset + j] · 2^j (mod N)`, truncating when the window runs
/// past the end of the vector. `bit_len ≤ 255` keeps `2^bit_len` below the
/// group order so the decomposition is injective on arbitrary bit
/// patterns; at the full width of 256 it is injective only on canonical
/// scalar decompositions.
pub fn scalar_from_bits(bits: &BitVector, offset: usize, bit_len: usize) -> Fr {
    assert!(bit_len <= 256);
    let mut le_bytes = [0u8; 32];
    for j in 0..bit_len {
        let i = offset + j;
        if i >= bits.len() {
            break;
        }
        if bits.get(i) {
            le_bytes[divide_by_8(j)] |= 1 << modulo_8(j);
        }
    }
    Fr::from_le_bytes_mod_order(&le_bytes)
}

/// A packed bit matrix in row-major order. The column count must be a
/// multiple of 8 so rows are whole byte slices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitMatrix {
    rows: usize,
    cols: usize,
    bytes: Vec<u8>,
}

impl BitMatrix {
    pub fn zero(rows: usize, cols: usize) -> Self {
        assert!(is_multiple_of_8(cols));
        Self {
            rows,
            cols,
            bytes: vec![0u8; rows * divide_by_8(cols)],
        }
    }

    /// Uniformly random matrix.
    pub fn random<R: RngCore>(rng: &mut R, rows: usize, cols: usize) -> Self {
        let mut m = Self::zero(rows, cols);
        rng.fill_bytes(&mut m.bytes);
        m
    }

    /// Deterministic matrix expanded from a 32-byte seed with HKDF-Keccak,
    /// info = be32(rows) ‖ be32(cols).
    pub fn from_seed(seed: &[u8; 32], rows: usize, cols: usize) -> Self {
        let mut m = Self::zero(rows, cols);
        let mut info = [0u8; 8];
        info[..4].copy_from_slice(&(rows as u32).to_be_bytes());
        info[4..].copy_from_slice(&(cols as u32).to_be_bytes());
        hkdf_keccak256_blocks(seed, &info, &mut m.bytes);
        m
    }

    pub fn from_parts(bytes: Vec<u8>, rows: usize, cols: usize) -> Option<Self> {
        if !is_multiple_of_8(cols) || bytes.len() != rows * divide_by_8(cols) {
            return None;
        }
        Some(Self { rows, cols, bytes })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row_byte_size(&self) -> usize {
        divide_by_8(self.cols)
    }

    pub fn row(&self, i: usize) -> &[u8] {
        let size = self.row_byte_size();
        &self.bytes[i * size..(i + 1) * size]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [u8] {
        let size = self.row_byte_size();
        &mut self.bytes[i * size..(i + 1) * size]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bitwise transpose. Requires both dimensions to be multiples of 8.
    pub fn transpose(&self) -> Self {
        assert!(is_multiple_of_8(self.rows));
        let mut out = Self::zero(self.cols, self.rows);
        for i in 0..self.rows * self.cols {
            let (row, col) = (i / self.cols, i % self.cols);
            if get_bit(&self.bytes, i) {
                set_bit(&mut out.bytes, col * self.rows + row, true);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn bit_vector_packing() {
        let mut v = BitVector::new(11);
        v.set(0, true);
        v.set(8, true);
        v.set(10, true);
        assert_eq!(v.as_bytes(), &[0b0000_0001, 0b0000_0101]);
        assert!(v.get(0) && v.get(8) && v.get(10));
        assert!(!v.get(1));
        let bools = v.to_bools();
        assert_eq!(BitVector::from_bools(&bools), v);
    }

    #[test]
    fn from_bytes_masks_spare_bits() {
        let v = BitVector::from_bytes(vec![0xff, 0xff], 11).unwrap();
        assert_eq!(v.as_bytes(), &[0xff, 0b0000_0111]);
        assert!(BitVector::from_bytes(vec![0xff], 11).is_none());
    }

    #[test]
    fn transpose_round_trip() {
        let mut rng = StdRng::seed_from_u64(0u64);
        for (r, c) in [(8, 8), (16, 8), (128, 16), (256, 128)] {
            let m = BitMatrix::random(&mut rng, r, c);
            assert_eq!(m.transpose().transpose(), m);
        }
    }

    #[test]
    fn transpose_moves_bits() {
        let mut m = BitMatrix::zero(8, 16);
        m.row_mut(3)[1] = 0b0000_0100; // bit (3, 10)
        let t = m.transpose();
        assert!(get_bit(t.row(10), 3));
    }

    #[test]
    fn seeded_matrix_is_deterministic() {
        let a = BitMatrix::from_seed(&[42u8; 32], 16, 256);
        let b = BitMatrix::from_seed(&[42u8; 32], 16, 256);
        let c = BitMatrix::from_seed(&[43u8; 32], 16, 256);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn scalar_from_bits_little_endian() {
        let v = BitVector::from_bools(&[true, false, true, true]); // 0b1101 = 13
        assert_eq!(scalar_from_bits(&v, 0, 4), Fr::from(13u64));
        // window truncates at the end of the vector
        assert_eq!(scalar_from_bits(&v, 2, 16), Fr::from(3u64));
        assert_eq!(scalar_from_bits(&v, 1, 2), Fr::from(2u64));
    }

    #[test]
    fn ct_eq_basic() {
        assert!(ct_eq(b"abc", b"abc"));
        assert!(!ct_eq(b"abc", b"abd"));
        assert!(!ct_eq(b"abc", b"ab"));
    }
}
