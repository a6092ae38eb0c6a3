extern crate alloc;
use crate::{
    error::Error,
    extends::AffineExtend,
    hash::{
        evm_scalar_from_points, hash_to_curve, hash_to_curve_prefix, output_hash,
        plain_scalar_from_points,
    },
    helper::{ecmult, ecmult_gen, random_scalar},
};
use alloc::string::String;
use libsecp256k1::{
    curve::{Affine, ECMultContext, ECMultGenContext, Jacobian, Scalar, AFFINE_G},
    util::{FULL_PUBLIC_KEY_SIZE, SECRET_KEY_SIZE},
    PublicKey, SecretKey, ECMULT_CONTEXT, ECMULT_GEN_CONTEXT,
};
use rand::thread_rng;

/// Zeroable trait
pub trait Zeroable {
    /// Zeroize self
    fn zeroize(&mut self);
    /// Check self is zero or not
    fn is_zero(&self) -> bool;
}

#[derive(Debug, Eq, PartialEq)]
/// Key pair
pub struct KeyPair {
    /// Public key
    pub public_key: PublicKey,
    /// Secret key
    pub secret_key: SecretKey,
}

#[derive(Debug, Eq, PartialEq)]
/// Raw key pair
pub struct RawKeyPair {
    /// Raw public key
    pub public_key: [u8; FULL_PUBLIC_KEY_SIZE],
    /// Raw secret key
    pub secret_key: [u8; SECRET_KEY_SIZE],
}

impl Default for KeyPair {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyPair {
    /// Generate a new key pair
    pub fn new() -> Self {
        let mut rng = thread_rng();
        let secret_key = SecretKey::random(&mut rng);
        let public_key = PublicKey::from_secret_key(&secret_key);
        KeyPair {
            public_key,
            secret_key,
        }
    }
}

impl Zeroable for RawKeyPair {
    fn zeroize(&mut self) {
        self.public_key.fill(0);
        self.secret_key.fill(0);
    }

    fn is_zero(&self) -> bool {
        self.public_key.iter().all(|b| *b == 0) && self.secret_key.iter().all(|b| *b == 0)
    }
}

impl From<SecretKey> for KeyPair {
    fn from(value: SecretKey) -> Self {
        KeyPair {
            public_key: PublicKey::from_secret_key(&value),
            secret_key: value,
        }
    }
}

impl From<&[u8; SECRET_KEY_SIZE]> for KeyPair {
    fn from(value: &[u8; SECRET_KEY_SIZE]) -> Self {
        let secret_instance = SecretKey::parse(value).expect("Can not parse secret key");
        KeyPair {
            public_key: PublicKey::from_secret_key(&secret_instance),
            secret_key: secret_instance,
        }
    }
}

impl From<String> for KeyPair {
    fn from(value: String) -> Self {
        let mut secret_key = [0u8; SECRET_KEY_SIZE];
        hex::decode_to_slice(value.trim().trim_start_matches("0x"), &mut secret_key)
            .expect("Unable to convert secret key to [u8; SECRET_KEY_SIZE]");
        Self::from(&secret_key)
    }
}

impl From<&KeyPair> for RawKeyPair {
    fn from(value: &KeyPair) -> Self {
        RawKeyPair {
            public_key: value.public_key.serialize(),
            secret_key: value.secret_key.serialize(),
        }
    }
}

/// Hash-to-curve function of a cipher suite
pub type HashToCurveFn = fn(&Affine, &Scalar) -> Result<Affine, Error>;

/// Output-hash function of a cipher suite
pub type OutputHashFn = fn(&Affine) -> Scalar;

/// Challenge-derivation function of a cipher suite, over the transcript
/// (G, H, pk, gamma, U, V)
pub type ScalarFromPointsFn =
    fn(&Affine, &Affine, &Affine, &Affine, &Affine, &Affine) -> Scalar;

/// A cipher suite bundles the three hash conventions the engine is generic
/// over. Swapping domain separation never touches the core algorithm.
#[derive(Clone, Copy)]
pub struct CipherSuite {
    /// Map (pk, alpha) to a curve point
    pub hash_to_curve: HashToCurveFn,
    /// Map gamma to the published random output
    pub output_hash: OutputHashFn,
    /// Fiat-Shamir challenge over the protocol transcript
    pub scalar_from_points: ScalarFromPointsFn,
}

fn plain_hash_to_curve(pk: &Affine, alpha: &Scalar) -> Result<Affine, Error> {
    Ok(hash_to_curve(alpha, Some(pk)))
}

impl CipherSuite {
    /// The on-chain convention: try-and-increment hash to curve, prefixed
    /// keccak output, challenge committing to U through its witness address.
    pub fn evm() -> Self {
        CipherSuite {
            hash_to_curve: hash_to_curve_prefix,
            output_hash,
            scalar_from_points: evm_scalar_from_points,
        }
    }

    /// Witness-free convention hashing the whole six-point transcript.
    pub fn plain() -> Self {
        CipherSuite {
            hash_to_curve: plain_hash_to_curve,
            output_hash,
            scalar_from_points: plain_scalar_from_points,
        }
    }
}

impl Default for CipherSuite {
    fn default() -> Self {
        Self::evm()
    }
}

/// EC-VRF proof, the minimal transferable part. The verifier recovers pk
/// and h on its own.
#[derive(Clone, Copy, Debug)]
pub struct ECVRFProof {
    /// gamma = sk * H
    pub gamma: Affine,
    /// Challenge
    pub c: Scalar,
    /// Response s = k - c * sk
    pub s: Scalar,
}

/// Prover-side proof material, kept around for conversion into the
/// on-chain encoding.
#[derive(Clone, Copy, Debug)]
pub struct RawProof {
    /// Public key
    pub pk: Affine,
    /// Hash-to-curve image of the seed
    pub h: Affine,
    /// gamma = sk * H
    pub gamma: Affine,
    /// Challenge
    pub c: Scalar,
    /// Response s = k - c * sk
    pub s: Scalar,
}

impl From<&RawProof> for ECVRFProof {
    fn from(value: &RawProof) -> Self {
        ECVRFProof {
            gamma: value.gamma,
            c: value.c,
            s: value.s,
        }
    }
}

/// ECVRF
pub struct ECVRF<'a> {
    secret_key: SecretKey,
    public_key: PublicKey,
    suite: CipherSuite,
    ctx_mul: &'a ECMultContext,
    ctx_gen: &'a ECMultGenContext,
}

impl<'a> ECVRF<'a> {
    /// Create new instance of ECVRF from a secret key, with the on-chain
    /// cipher suite
    pub fn new(secret_key: SecretKey) -> Self {
        Self::with_suite(secret_key, CipherSuite::evm())
    }

    /// Create new instance of ECVRF with an explicit cipher suite
    pub fn with_suite(secret_key: SecretKey, suite: CipherSuite) -> Self {
        ECVRF {
            secret_key,
            public_key: PublicKey::from_secret_key(&secret_key),
            suite,
            ctx_gen: &ECMULT_GEN_CONTEXT,
            ctx_mul: &ECMULT_CONTEXT,
        }
    }

    /// Public key of the proving key pair
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Cipher suite this instance proves under
    pub fn suite(&self) -> &CipherSuite {
        &self.suite
    }

    /// Prove a seed, returning the minimal proof
    pub fn prove(&self, alpha: &Scalar) -> Result<ECVRFProof, Error> {
        self.prove_raw(alpha).map(|raw| ECVRFProof::from(&raw))
    }

    /// Prove a seed, keeping pk and h for later conversion into the
    /// on-chain encoding
    pub fn prove_raw(&self, alpha: &Scalar) -> Result<RawProof, Error> {
        let mut pub_affine: Affine = self.public_key.into();
        let mut secret_key: Scalar = self.secret_key.into();
        pub_affine.x.normalize();
        pub_affine.y.normalize();

        // H = hash_to_curve(pk, alpha)
        let h = (self.suite.hash_to_curve)(&pub_affine, alpha)?;

        // gamma = H * sk
        let gamma = ecmult(self.ctx_mul, &h, &secret_key);

        // Fresh ephemeral scalar. Reusing k across proofs under the same
        // secret key leaks the key, so it must be uniform every time.
        let k = random_scalar()?;

        // U = k * G, V = k * H
        let kg = ecmult_gen(self.ctx_gen, &k);
        let kh = ecmult(self.ctx_mul, &h, &k);

        // c = scalar_from_points(G, H, pk, gamma, k * G, k * H)
        let c = (self.suite.scalar_from_points)(&AFFINE_G, &h, &pub_affine, &gamma, &kg, &kh);

        // s = (k - c * sk) mod n
        let mut neg_c = c;
        neg_c.cond_neg_assign(1.into());
        let s = k + neg_c * secret_key;
        secret_key.clear();

        Ok(RawProof {
            pk: pub_affine,
            h,
            gamma,
            c,
            s,
        })
    }

    /// Verify a proof against a public key and seed. Never raises:
    /// rejection is a definitive negative result, not an error.
    pub fn verify(&self, public_key: &PublicKey, alpha: &Scalar, proof: &ECVRFProof) -> bool {
        let mut pub_affine: Affine = (*public_key).into();
        pub_affine.x.normalize();
        pub_affine.y.normalize();

        if !pub_affine.is_valid_var() || !proof.gamma.is_valid_var() {
            return false;
        }

        // H = hash_to_curve(pk, alpha)
        let h = match (self.suite.hash_to_curve)(&pub_affine, alpha) {
            Ok(h) => h,
            Err(_) => return false,
        };

        // U = c * pk + s * G
        //   = c * sk * G + (k - c * sk) * G
        //   = k * G
        let mut u = Jacobian::default();
        let pub_jacobian = Jacobian::from_ge(&pub_affine);
        self.ctx_mul.ecmult(&mut u, &pub_jacobian, &proof.c, &proof.s);

        // V = c * gamma + s * H
        //   = c * sk * H + (k - c * sk) * H
        //   = k * H
        let witness_gamma = ecmult(self.ctx_mul, &proof.gamma, &proof.c);
        let witness_hash = ecmult(self.ctx_mul, &h, &proof.s);
        let v = Jacobian::from_ge(&witness_gamma).add_ge(&witness_hash);

        if u.is_infinity() || v.is_infinity() {
            return false;
        }

        let computed_c = (self.suite.scalar_from_points)(
            &AFFINE_G,
            &h,
            &pub_affine,
            &proof.gamma,
            &Affine::from_jacobian(&u),
            &Affine::from_jacobian(&v),
        );

        computed_c.eq(&proof.c)
    }

    /// The published random output of a proof. Two proofs over the same
    /// (sk, alpha) publish the same output even when their (c, s) differ.
    pub fn compute(&self, proof: &ECVRFProof) -> Scalar {
        (self.suite.output_hash)(&proof.gamma)
    }
}
