use crate::error::Error;
use crate::extends::{AffineExtend, ScalarExtend};
use libsecp256k1::{
    curve::{Affine, ECMultContext, ECMultGenContext, Field, Jacobian, Scalar},
    PublicKey,
};
use rand::{thread_rng, RngCore};

/// Max retries for scalar sampling and hash-to-curve candidates
pub const MAX_RETRIES: u32 = 100;

/// Field size 2^256 - 0x1000003D1
/// [FIELD_SIZE](crate::helper::FIELD_SIZE) = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F;
pub const FIELD_SIZE: Scalar = Scalar([
    0xFFFFFC2F, 0xFFFFFFFE, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF,
]);

/// Group order
/// [GROUP_ORDER](crate::helper::GROUP_ORDER) = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
pub const GROUP_ORDER: Scalar = Scalar([
    0xD0364141, 0xBFD25E8C, 0xAF48A03B, 0xBAAEDCE6, 0xFFFFFFFE, 0xFFFFFFFF, 0xFFFFFFFF, 0xFFFFFFFF,
]);

/// Group order as big-endian bytes, for comparing digests before reduction
pub const GROUP_ORDER_BE: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Homogeneous projective point on P^2(F_p), affine value is (x/z, y/z)
#[derive(Clone, Copy, Debug)]
pub struct Projective {
    /// X coordinate
    pub x: Field,
    /// Y coordinate
    pub y: Field,
    /// Z coordinate
    pub z: Field,
}

impl Projective {
    /// Resolve to affine, performing the single deferred inversion
    pub fn to_affine(&self) -> Affine {
        let mut z_inv = self.z.inv();
        z_inv.normalize();
        let x = self.x * z_inv;
        let y = self.y * z_inv;
        Affine::compose(&x, &y)
    }
}

/// Projective sub on fractions: x1/z1 - x2/z2 = (x1*z2 - z1*x2)/(z1*z2)
pub fn projective_sub(x1: &Field, z1: &Field, x2: &Field, z2: &Field) -> (Field, Field) {
    let mut num = *x1 * *z2 + (*z1 * *x2).neg(1);
    let mut den = *z1 * *z2;
    num.normalize();
    den.normalize();
    (num, den)
}

/// In-place variant of [projective_sub], accumulating into the first fraction
pub fn projective_sub_assign(x1: &mut Field, z1: &mut Field, x2: &Field, z2: &Field) {
    let (num, den) = projective_sub(x1, z1, x2, z2);
    *x1 = num;
    *z1 = den;
}

/// Projective mul on fractions: x1/z1 * x2/z2 = (x1*x2)/(z1*z2)
pub fn projective_mul(x1: &Field, z1: &Field, x2: &Field, z2: &Field) -> (Field, Field) {
    let mut num = *x1 * *x2;
    let mut den = *z1 * *z2;
    num.normalize();
    den.normalize();
    (num, den)
}

/// In-place variant of [projective_mul], accumulating into the first fraction
pub fn projective_mul_assign(x1: &mut Field, z1: &mut Field, x2: &Field, z2: &Field) {
    let (num, den) = projective_mul(x1, z1, x2, z2);
    *x1 = num;
    *z1 = den;
}

/// Point addition in projective coordinates, deferring the inversion to the
/// caller. The summands must be distinct valid curve points; the surrounding
/// protocol guarantees distinctness, so the doubling case is never needed.
pub fn projective_ec_add(p: &Affine, q: &Affine) -> Projective {
    let one = Field::from_int(1);

    // Secant line slope as an unreduced fraction lx/lz = (qy - py)/(qx - px)
    let mut lx = q.y + p.y.neg(1);
    let mut lz = q.x + p.x.neg(1);
    lx.normalize();
    lz.normalize();

    // sx = ((qy - py)/(qx - px))^2 - px - qx
    let (mut sx, mut dx) = projective_mul(&lx, &lz, &lx, &lz);
    projective_sub_assign(&mut sx, &mut dx, &p.x, &one);
    projective_sub_assign(&mut sx, &mut dx, &q.x, &one);

    // sy = ((qy - py)/(qx - px))(px - sx) - py
    let (mut sy, mut dy) = projective_sub(&p.x, &one, &sx, &dx);
    projective_mul_assign(&mut sy, &mut dy, &lx, &lz);
    projective_sub_assign(&mut sy, &mut dy, &p.y, &one);

    let mut r = if dx != dy {
        // Cross-multiply onto a common denominator
        Projective {
            x: sx * dy,
            y: sy * dx,
            z: dx * dy,
        }
    } else {
        Projective {
            x: sx,
            y: sy,
            z: dx,
        }
    };
    r.x.normalize();
    r.y.normalize();
    r.z.normalize();
    r
}

/// Perform multiplication between a point and a scalar: na * P
pub fn ecmult(context: &ECMultContext, a: &Affine, na: &Scalar) -> Affine {
    let mut rj = Jacobian::default();
    context.ecmult(&mut rj, &Jacobian::from_ge(a), na, &Scalar::from_int(0));
    Affine::from_jacobian(&rj)
}

/// Perform multiplication between a scalar and G: ng * G
pub fn ecmult_gen(context: &ECMultGenContext, ng: &Scalar) -> Affine {
    let mut rj = Jacobian::default();
    context.ecmult_gen(&mut rj, ng);
    Affine::from_jacobian(&rj)
}

/// Sample a nonzero scalar strictly below the group order. Rejection happens
/// on the raw bytes, before any reduction could fold the bias back in.
pub fn random_scalar() -> Result<Scalar, Error> {
    let mut buf = [0u8; 32];
    for _ in 0..MAX_RETRIES {
        random_bytes(&mut buf);
        if buf >= GROUP_ORDER_BE || buf == [0u8; 32] {
            continue;
        }
        return Ok(Scalar::from_bytes(&buf));
    }
    Err(Error::RetriesExceeded)
}

/// Calculate witness address from an Affine: the low 20 bytes of
/// keccak256(x || y)
pub fn calculate_witness_address(witness: &Affine) -> [u8; 20] {
    let mut result = [0u8; 20];
    result.copy_from_slice(&witness.keccak256()[12..32]);
    result
}

/// Hash a public key and return an Ethereum style address
pub fn get_address(pub_key: &PublicKey) -> [u8; 20] {
    let mut affine_pub: Affine = (*pub_key).into();
    affine_pub.x.normalize();
    affine_pub.y.normalize();
    calculate_witness_address(&affine_pub)
}

/// Identifier of an oracle proving key: keccak256 over both coordinates
pub fn hash_of_key(pub_key: &PublicKey) -> [u8; 32] {
    let mut affine_pub: Affine = (*pub_key).into();
    affine_pub.x.normalize();
    affine_pub.y.normalize();
    affine_pub.keccak256()
}

/// Random bytes array
pub fn random_bytes(buf: &mut [u8]) {
    let mut rng = thread_rng();
    rng.fill_bytes(buf);
}
