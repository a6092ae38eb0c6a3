use crate::{
    error::Error,
    extends::{AffineExtend, ScalarExtend},
    helper::{calculate_witness_address, GROUP_ORDER_BE, MAX_RETRIES},
};
use libsecp256k1::{
    curve::{Affine, Field, Jacobian, Scalar},
    ECMULT_GEN_CONTEXT,
};
use tiny_keccak::{Hasher, Keccak};

/// Domain separation prefix for hash-to-curve
pub const HASH_TO_CURVE_HASH_PREFIX: u32 = 1;

/// Domain separation prefix for challenge derivation
pub const SCALAR_FROM_CURVE_POINTS_HASH_PREFIX: u32 = 2;

/// Domain separation prefix for the published random output
pub const VRF_RANDOM_OUTPUT_HASH_PREFIX: u32 = 3;

fn keccak256(b: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    let mut hasher = Keccak::v256();
    hasher.update(b);
    hasher.finalize(&mut output);
    output
}

/// Hash a bytes array to a field element. The digest is re-hashed while it is
/// not strictly below the group order, so the result carries no modular bias.
pub fn field_hash(b: &[u8]) -> Field {
    let mut output = keccak256(b);
    while output >= GROUP_ORDER_BE {
        output = keccak256(&output);
    }
    let mut f = Field::default();
    if !f.set_b32(&output) {
        f.normalize();
    }
    f
}

/// Y squared, evaluated from X
pub fn y_squared(x: &Field) -> Field {
    let mut t = *x;
    // y^2 = x^3 + 7
    t = t * t * t + Field::from_int(7);
    t.normalize();
    t
}

/// Check point is on curve or not
pub fn is_on_curve(point: &Affine) -> bool {
    y_squared(&point.x) == point.y * point.y
}

/// Derive a candidate point from a bytes array. The X coordinate is a field
/// hash of the input, Y is the even root of x^3 + 7; the candidate is
/// unvalidated and roughly half of them are off curve.
pub fn new_candidate_point(b: &[u8]) -> Affine {
    let mut x = field_hash(b);
    let (mut y, _) = y_squared(&x).sqrt();
    x.normalize();
    y.normalize();

    if y.is_odd() {
        y = y.neg(1);
        y.normalize();
    }
    Affine::compose(&x, &y)
}

/// Try-and-increment hash to curve. The first candidate hashes the prefixed
/// public key and seed; every rejected candidate re-hashes its own X
/// coordinate. Bounded at [MAX_RETRIES] candidates, which fails with
/// probability around 2^-100.
pub fn hash_to_curve_prefix(pk: &Affine, alpha: &Scalar) -> Result<Affine, Error> {
    let mut tpk = *pk;
    tpk.x.normalize();
    tpk.y.normalize();
    let packed = [
        Scalar::from_int(HASH_TO_CURVE_HASH_PREFIX).b32().to_vec(),
        tpk.x.b32().to_vec(),
        tpk.y.b32().to_vec(),
        alpha.b32().to_vec(),
    ]
    .concat();
    let mut rv = new_candidate_point(&packed);
    for _ in 0..MAX_RETRIES {
        if is_on_curve(&rv) {
            return Ok(rv);
        }
        rv = new_candidate_point(rv.x.b32().as_ref());
    }
    Err(Error::HashToCurveFailed)
}

/// Transcript hash over six points, reduced to a scalar. The witness-free
/// challenge used where no address commitment is required.
pub fn hash_points(
    g: &Affine,
    h: &Affine,
    pk: &Affine,
    gamma: &Affine,
    kg: &Affine,
    kh: &Affine,
) -> Scalar {
    let mut hasher = Keccak::v256();
    let all_points = [g, h, pk, gamma, kg, kh];
    for point in all_points {
        hasher.update(point.x.b32().as_ref());
        hasher.update(point.y.b32().as_ref());
    }
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    Scalar::from_bytes(&output)
}

/// Prefixed transcript hash over four points and the witness address of u,
/// the Fiat-Shamir challenge an on-chain verifier recomputes.
pub fn hash_points_prefix(
    hash: &Affine,
    pk: &Affine,
    gamma: &Affine,
    u_witness: &[u8; 20],
    v: &Affine,
) -> Scalar {
    let mut hasher = Keccak::v256();
    hasher.update(
        Scalar::from_int(SCALAR_FROM_CURVE_POINTS_HASH_PREFIX)
            .b32()
            .as_ref(),
    );
    let all_points = [hash, pk, gamma, v];
    for point in all_points {
        hasher.update(point.x.b32().as_ref());
        hasher.update(point.y.b32().as_ref());
    }
    hasher.update(u_witness);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    Scalar::from_bytes(&output)
}

/// The published random output: prefixed keccak over gamma's coordinates.
/// Deterministic in gamma, independent of the rest of the proof.
pub fn output_hash(gamma: &Affine) -> Scalar {
    let mut hasher = Keccak::v256();
    hasher.update(
        Scalar::from_int(VRF_RANDOM_OUTPUT_HASH_PREFIX)
            .b32()
            .as_ref(),
    );
    hasher.update(gamma.x.b32().as_ref());
    hasher.update(gamma.y.b32().as_ref());
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    Scalar::from_bytes(&output)
}

/// Challenge function of the EVM suite: commit to u through its witness
/// address, hash the rest of the transcript in full.
pub fn evm_scalar_from_points(
    _g: &Affine,
    h: &Affine,
    pk: &Affine,
    gamma: &Affine,
    u: &Affine,
    v: &Affine,
) -> Scalar {
    hash_points_prefix(h, pk, gamma, &calculate_witness_address(u), v)
}

/// Challenge function of the plain suite: the whole transcript in full.
pub fn plain_scalar_from_points(
    g: &Affine,
    h: &Affine,
    pk: &Affine,
    gamma: &Affine,
    u: &Affine,
    v: &Affine,
) -> Scalar {
    hash_points(g, h, pk, gamma, u, v)
}

/// Generator-shift map: alpha * G, shifted by the public key. Cheap, not
/// uniform; the plain suite uses it where no on-chain verifier is involved.
pub fn hash_to_curve(alpha: &Scalar, y: Option<&Affine>) -> Affine {
    let mut r = Jacobian::default();
    ECMULT_GEN_CONTEXT.ecmult_gen(&mut r, alpha);
    if let Some(v) = y {
        r = r.add_ge(v);
    }
    Affine::from_jacobian(&r)
}
