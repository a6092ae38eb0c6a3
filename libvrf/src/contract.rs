use crate::{
    ecvrf::{ECVRF, RawProof},
    extends::AffineExtend,
    hash::is_on_curve,
    helper::{calculate_witness_address, ecmult, projective_ec_add},
};
use libsecp256k1::curve::{Affine, Field, Jacobian, Scalar, AFFINE_G};

/// Proof in the encoding a resource-constrained verifier checks without
/// performing any scalar multiplication or modular inversion of its own:
/// u is committed to only through its 20-byte witness address, the two
/// witness points carry the decomposition of v, and z_inv lets the verifier
/// confirm the projective sum by a single multiplication.
///
/// Invariant: z_inv * z = 1 (mod p) where z is the projective z coordinate
/// of c_gamma_witness + s_hash_witness under [projective_ec_add].
#[derive(Clone, Copy, Debug)]
pub struct ContractProof {
    /// Public key
    pub pk: Affine,
    /// gamma = sk * H
    pub gamma: Affine,
    /// Challenge
    pub c: Scalar,
    /// Response s = k - c * sk
    pub s: Scalar,
    /// Seed the proof was made over
    pub seed: Scalar,
    /// Address commitment to u = c * pk + s * G
    pub u_witness: [u8; 20],
    /// c * gamma, one summand of v
    pub c_gamma_witness: Affine,
    /// s * H, the other summand of v
    pub s_hash_witness: Affine,
    /// Inverse of the projective z of c_gamma_witness + s_hash_witness
    pub z_inv: Field,
}

impl<'a> ECVRF<'a> {
    /// Convert a raw proof into the on-chain encoding. The raw proof must
    /// have been produced under the same cipher suite this instance
    /// verifies with, or the re-derived challenge will not match.
    pub fn convert_proof(&self, raw: &RawProof, seed: &Scalar) -> ContractProof {
        // u = c * pk + s * G, committed to as an address only
        let mut u = Jacobian::default();
        let ctx = &libsecp256k1::ECMULT_CONTEXT;
        ctx.ecmult(&mut u, &Jacobian::from_ge(&raw.pk), &raw.c, &raw.s);
        let u_witness = calculate_witness_address(&Affine::from_jacobian(&u));

        // witness points carrying v = c * gamma + s * H
        let c_gamma_witness = ecmult(ctx, &raw.gamma, &raw.c);
        let s_hash_witness = ecmult(ctx, &raw.h, &raw.s);

        // The sum is left projective; inverting its z here is what spares
        // the verifier the inversion.
        let v = projective_ec_add(&c_gamma_witness, &s_hash_witness);
        let mut z_inv = v.z.inv();
        z_inv.normalize();

        ContractProof {
            pk: raw.pk,
            gamma: raw.gamma,
            c: raw.c,
            s: raw.s,
            seed: *seed,
            u_witness,
            c_gamma_witness,
            s_hash_witness,
            z_inv,
        }
    }

    /// Prove a seed directly into the on-chain encoding
    pub fn prove_contract(&self, alpha: &Scalar) -> Result<ContractProof, crate::error::Error> {
        let raw = self.prove_raw(alpha)?;
        Ok(self.convert_proof(&raw, alpha))
    }

    /// Verify a proof in the on-chain encoding. All checks must pass; any
    /// single failure rejects the proof as a whole.
    pub fn verify_contract(
        &self,
        public_key: &libsecp256k1::PublicKey,
        alpha: &Scalar,
        proof: &ContractProof,
    ) -> bool {
        let mut pub_affine: Affine = (*public_key).into();
        pub_affine.x.normalize();
        pub_affine.y.normalize();

        // Embedded pk and seed must match what the caller expects
        if pub_affine.x != proof.pk.x || pub_affine.y != proof.pk.y {
            return false;
        }
        if !proof.seed.eq(alpha) {
            return false;
        }

        if !is_on_curve(&proof.gamma) {
            return false;
        }

        let h = match (self.suite().hash_to_curve)(&pub_affine, alpha) {
            Ok(h) => h,
            Err(_) => return false,
        };

        // u recomputed in full, then compared through its address commitment
        let mut u = Jacobian::default();
        let ctx = &libsecp256k1::ECMULT_CONTEXT;
        ctx.ecmult(&mut u, &Jacobian::from_ge(&pub_affine), &proof.c, &proof.s);
        if u.is_infinity() {
            return false;
        }
        let u_affine = Affine::from_jacobian(&u);
        if calculate_witness_address(&u_affine) != proof.u_witness {
            return false;
        }

        // The witness points must be exactly c * gamma and s * H
        let c_gamma = ecmult(ctx, &proof.gamma, &proof.c);
        let s_hash = ecmult(ctx, &h, &proof.s);
        if c_gamma.x != proof.c_gamma_witness.x || c_gamma.y != proof.c_gamma_witness.y {
            return false;
        }
        if s_hash.x != proof.s_hash_witness.x || s_hash.y != proof.s_hash_witness.y {
            return false;
        }

        // v from the witnesses, resolved with the prover-supplied inverse.
        // z * z_inv must be exactly one or the denominator is forged.
        let v = projective_ec_add(&proof.c_gamma_witness, &proof.s_hash_witness);
        let mut z_check = v.z * proof.z_inv;
        z_check.normalize();
        let mut one = Field::from_int(1);
        one.normalize();
        if z_check != one {
            return false;
        }
        let vx = v.x * proof.z_inv;
        let vy = v.y * proof.z_inv;
        let v_affine = Affine::compose(&vx, &vy);

        let computed_c = (self.suite().scalar_from_points)(
            &AFFINE_G,
            &h,
            &pub_affine,
            &proof.gamma,
            &u_affine,
            &v_affine,
        );
        computed_c.eq(&proof.c)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        extends::{AffineExtend, ScalarExtend},
        helper::projective_ec_add,
        ECVRF,
    };
    use libsecp256k1::curve::{Field, Scalar};
    use libsecp256k1::SecretKey;
    use rand::thread_rng;

    fn instance() -> ECVRF<'static> {
        let mut r = thread_rng();
        ECVRF::new(SecretKey::random(&mut r))
    }

    #[test]
    fn contract_proof_round_trip() {
        let ecvrf = instance();
        let alpha = Scalar::randomize();
        let proof = ecvrf.prove_contract(&alpha).expect("prove");
        assert!(ecvrf.verify_contract(ecvrf.public_key(), &alpha, &proof));
    }

    #[test]
    fn contract_proof_matches_raw_verification() {
        let ecvrf = instance();
        let alpha = Scalar::randomize();
        let raw = ecvrf.prove_raw(&alpha).expect("prove");
        let converted = ecvrf.convert_proof(&raw, &alpha);
        assert!(ecvrf.verify_contract(ecvrf.public_key(), &alpha, &converted));
        let minimal = crate::ECVRFProof::from(&raw);
        assert!(ecvrf.verify(ecvrf.public_key(), &alpha, &minimal));
    }

    #[test]
    fn flipped_inverse_z_is_rejected() {
        let ecvrf = instance();
        let alpha = Scalar::randomize();
        let mut proof = ecvrf.prove_contract(&alpha).expect("prove");
        let mut bad = proof.z_inv + Field::from_int(1);
        bad.normalize();
        proof.z_inv = bad;
        assert!(!ecvrf.verify_contract(ecvrf.public_key(), &alpha, &proof));
    }

    #[test]
    fn tampered_witness_address_is_rejected() {
        let ecvrf = instance();
        let alpha = Scalar::randomize();
        let mut proof = ecvrf.prove_contract(&alpha).expect("prove");
        proof.u_witness[19] ^= 0x01;
        assert!(!ecvrf.verify_contract(ecvrf.public_key(), &alpha, &proof));
    }

    #[test]
    fn mismatched_seed_is_rejected() {
        let ecvrf = instance();
        let alpha = Scalar::randomize();
        let proof = ecvrf.prove_contract(&alpha).expect("prove");
        assert!(!ecvrf.verify_contract(ecvrf.public_key(), &Scalar::randomize(), &proof));
    }

    #[test]
    fn inverse_z_cancels_projective_sum() {
        let ecvrf = instance();
        let alpha = Scalar::randomize();
        let proof = ecvrf.prove_contract(&alpha).expect("prove");
        let v = projective_ec_add(&proof.c_gamma_witness, &proof.s_hash_witness);
        let mut product = v.z * proof.z_inv;
        product.normalize();
        let mut one = Field::from_int(1);
        one.normalize();
        assert_eq!(product, one);
        // And the resolved affine agrees with the deferred-inversion view
        let resolved = v.to_affine();
        let vx = v.x * proof.z_inv;
        let vy = v.y * proof.z_inv;
        let direct = libsecp256k1::curve::Affine::compose(&vx, &vy);
        assert_eq!(resolved.x, direct.x);
        assert_eq!(resolved.y, direct.y);
    }
}
