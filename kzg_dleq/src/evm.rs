//! Calldata encoding for the on-chain assembly verifier. The contract
//! reconstructs `X = x·G`, `T = P − X` and the two Schnorr identities
//! through the ecrecover precompile; it cannot invert field elements
//! cheaply, so the encoder ships the two inversions it needs:
//! `Hinv = (Px − Xx)^−1 mod P` and `Hinv2 = (zTx − eCx)^−1 mod P`.

use crate::{
    challenge::{challenge_for_proof, parity_byte},
    error::KzgDleqError,
    proof::DleqProof,
};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, PrimeField};
use ark_std::vec::Vec;
use vanish_utils::{
    curve::{
        affine_coords, base_field_to_be_bytes, coordinate_parity, generator, scalar_to_be_bytes,
        Affine, Fq, Fr,
    },
    hashing::{ec_address, keccak256},
};

/// Calldata domain tag; bumped on any breaking change to the challenge
/// packing.
pub const CALLDATA_VERSION: u8 = 1;

/// 4-byte selector + version + 12 words + 2 addresses + parity.
pub const CALLDATA_LEN: usize = 4 + 1 + 32 * 12 + 20 * 2 + 1;

/// First four bytes of `Keccak256("verifyPolynomial()")`.
pub fn function_selector() -> [u8; 4] {
    let digest = keccak256(b"verifyPolynomial()");
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&digest[..4]);
    selector
}

/// The operands of one ecrecover-based curve check: to convince the
/// contract that `target = α·G + β·Q` the caller has it run
/// `ecrecover(digest = α·Qx mod N, v = 27 + (Qy & 1), r = Qx,
/// s = β·Qx mod N)` and compare the recovered address against
/// `ec_address(target)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcrecoverCheck {
    pub digest: [u8; 32],
    pub v: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub expected_address: [u8; 20],
}

impl EcrecoverCheck {
    /// The 128-byte ecrecover precompile input: digest ‖ pad32(v) ‖ r ‖ s.
    pub fn to_precompile_input(&self) -> [u8; 128] {
        let mut input = [0u8; 128];
        input[..32].copy_from_slice(&self.digest);
        input[63] = self.v;
        input[64..96].copy_from_slice(&self.r);
        input[96..].copy_from_slice(&self.s);
        input
    }
}

pub fn ecrecover_check(
    target: &Affine,
    alpha: &Fr,
    beta: &Fr,
    Q: &Affine,
) -> Result<EcrecoverCheck, KzgDleqError> {
    let (qx, qy) = affine_coords(Q).ok_or(KzgDleqError::PointAtInfinity)?;
    let expected_address = ec_address(target).ok_or(KzgDleqError::PointAtInfinity)?;
    let qx_bytes = base_field_to_be_bytes(&qx);
    let qx_mod_n = Fr::from_be_bytes_mod_order(&qx_bytes);
    Ok(EcrecoverCheck {
        digest: scalar_to_be_bytes(&(*alpha * qx_mod_n)),
        v: 27 + coordinate_parity(&qy),
        r: qx_bytes,
        s: scalar_to_be_bytes(&(*beta * qx_mod_n)),
        expected_address,
    })
}

/// Derived words of the calldata. All-zero when any derivation degenerates
/// (identity point or non-invertible difference); the contract rejects the
/// zero words, which is the intended failure path.
#[derive(Clone, Debug, Default)]
struct DerivedWords {
    Xx: [u8; 32],
    Xy: [u8; 32],
    zTx: [u8; 32],
    zTy: [u8; 32],
    eCx: [u8; 32],
    eCy: [u8; 32],
    Hinv: [u8; 32],
    Hinv2: [u8; 32],
}

fn derive_words(proof: &DleqProof, e: &Fr, px: &Fq) -> Option<DerivedWords> {
    let X = (generator() * proof.x).into_affine();
    let (xx, xy) = affine_coords(&X)?;
    let T = (proof.P.into_group() - X).into_affine();
    let zT = (T * proof.z).into_affine();
    let (ztx, zty) = affine_coords(&zT)?;
    let eC = (proof.C * *e).into_affine();
    let (ecx, ecy) = affine_coords(&eC)?;
    let h_inv = (*px - xx).inverse()?;
    let h_inv2 = (ztx - ecx).inverse()?;
    Some(DerivedWords {
        Xx: base_field_to_be_bytes(&xx),
        Xy: base_field_to_be_bytes(&xy),
        zTx: base_field_to_be_bytes(&ztx),
        zTy: base_field_to_be_bytes(&zty),
        eCx: base_field_to_be_bytes(&ecx),
        eCy: base_field_to_be_bytes(&ecy),
        Hinv: base_field_to_be_bytes(&h_inv),
        Hinv2: base_field_to_be_bytes(&h_inv2),
    })
}

/// Encode the 430-byte calldata blob the assembly verifier accepts iff the
/// proof is valid.
pub fn encode_verify_calldata(proof: &DleqProof) -> Result<Vec<u8>, KzgDleqError> {
    let (cx, cy) = affine_coords(&proof.C).ok_or(KzgDleqError::PointAtInfinity)?;
    let (wx, wy) = affine_coords(&proof.W).ok_or(KzgDleqError::PointAtInfinity)?;
    let (px, _) = affine_coords(&proof.P).ok_or(KzgDleqError::PointAtInfinity)?;
    let a1_addr = ec_address(&proof.A1).ok_or(KzgDleqError::PointAtInfinity)?;
    let a2_addr = ec_address(&proof.A2).ok_or(KzgDleqError::PointAtInfinity)?;
    let e = challenge_for_proof(
        &proof.C, &proof.W, &proof.P, &proof.A1, &proof.A2, &proof.x,
    )?;
    let derived = derive_words(proof, &e, &px).unwrap_or_default();

    let mut out = Vec::with_capacity(CALLDATA_LEN);
    out.extend_from_slice(&function_selector());
    out.push(CALLDATA_VERSION);
    out.extend_from_slice(&base_field_to_be_bytes(&cx));
    out.extend_from_slice(&base_field_to_be_bytes(&wx));
    out.extend_from_slice(&derived.Xx);
    out.extend_from_slice(&derived.Xy);
    out.extend_from_slice(&derived.zTx);
    out.extend_from_slice(&derived.zTy);
    out.extend_from_slice(&derived.eCx);
    out.extend_from_slice(&derived.eCy);
    out.extend_from_slice(&derived.Hinv);
    out.extend_from_slice(&derived.Hinv2);
    out.extend_from_slice(&scalar_to_be_bytes(&proof.z));
    out.extend_from_slice(&scalar_to_be_bytes(&proof.x));
    out.extend_from_slice(&a1_addr);
    out.extend_from_slice(&a2_addr);
    out.push(parity_byte(&cy, &wy));
    debug_assert_eq!(out.len(), CALLDATA_LEN);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{polynomial::Polynomial, proof::DleqProver};
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        vec,
        UniformRand,
    };

    fn sample_proof(rng: &mut StdRng) -> DleqProof {
        let s = Fr::from(12345u64);
        let x = Fr::from(5u64);
        let p = Polynomial::new(vec![-Fr::from(35u64), Fr::from(7u64)]);
        DleqProver::new(&p, x, &s).unwrap().prove(rng).unwrap()
    }

    #[test]
    fn calldata_has_contracted_length_and_prefix() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let proof = sample_proof(&mut rng);
        let calldata = encode_verify_calldata(&proof).unwrap();
        assert_eq!(calldata.len(), CALLDATA_LEN);
        assert_eq!(calldata.len(), 430);
        assert_eq!(&calldata[..4], &function_selector());
        assert_eq!(calldata[4], CALLDATA_VERSION);
    }

    #[test]
    fn calldata_is_deterministic_per_proof() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let proof = sample_proof(&mut rng);
        assert_eq!(
            encode_verify_calldata(&proof).unwrap(),
            encode_verify_calldata(&proof).unwrap()
        );
        let other = sample_proof(&mut rng);
        assert_ne!(
            encode_verify_calldata(&proof).unwrap(),
            encode_verify_calldata(&other).unwrap()
        );
    }

    #[test]
    fn derived_words_match_the_schnorr_identity() {
        // A2 = z·T − e·C, so z·T = A2 + e·C; check the encoder's zT and eC
        // words are consistent with that identity on a valid proof.
        let mut rng = StdRng::seed_from_u64(2u64);
        let proof = sample_proof(&mut rng);
        let e = challenge_for_proof(
            &proof.C, &proof.W, &proof.P, &proof.A1, &proof.A2, &proof.x,
        )
        .unwrap();
        let X = (generator() * proof.x).into_affine();
        let T = (proof.P.into_group() - X).into_affine();
        let zT = (T * proof.z).into_affine();
        let eC = (proof.C * e).into_affine();
        assert_eq!(
            (proof.A2.into_group() + eC).into_affine(),
            zT,
        );
        let calldata = encode_verify_calldata(&proof).unwrap();
        let (ztx, _) = affine_coords(&zT).unwrap();
        assert_eq!(&calldata[4 + 1 + 32 * 4..4 + 1 + 32 * 5], &base_field_to_be_bytes(&ztx));
    }

    #[test]
    fn degenerate_inputs_zero_fill_derived_words() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let mut proof = sample_proof(&mut rng);
        // make P equal X so that T degenerates and (Px − Xx) is zero
        proof.P = (generator() * proof.x).into_affine();
        let calldata = encode_verify_calldata(&proof).unwrap();
        assert_eq!(calldata.len(), CALLDATA_LEN);
        assert!(calldata[4 + 1 + 32 * 2..4 + 1 + 32 * 10].iter().all(|b| *b == 0));
    }

    #[test]
    fn ecrecover_check_operands() {
        let mut rng = StdRng::seed_from_u64(4u64);
        let Q = (generator() * Fr::rand(&mut rng)).into_affine();
        let alpha = Fr::rand(&mut rng);
        let beta = Fr::rand(&mut rng);
        let target = (generator() * alpha + Q * beta).into_affine();
        let check = ecrecover_check(&target, &alpha, &beta, &Q).unwrap();
        let (qx, qy) = affine_coords(&Q).unwrap();
        assert_eq!(check.r, base_field_to_be_bytes(&qx));
        assert_eq!(check.v, 27 + coordinate_parity(&qy));
        assert_eq!(check.expected_address, ec_address(&target).unwrap());
        let qx_n = Fr::from_be_bytes_mod_order(&base_field_to_be_bytes(&qx));
        assert_eq!(check.digest, scalar_to_be_bytes(&(alpha * qx_n)));
        assert_eq!(check.s, scalar_to_be_bytes(&(beta * qx_n)));

        let input = check.to_precompile_input();
        assert_eq!(&input[..32], &check.digest);
        assert_eq!(input[63], check.v);
        assert!(input[32..63].iter().all(|b| *b == 0));
        assert_eq!(&input[64..96], &check.r);
        assert_eq!(&input[96..], &check.s);
    }
}
