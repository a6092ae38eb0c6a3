use crate::error::Error;
use libvrf::{
    extends::{AffineExtend, ScalarExtend},
    hash::output_hash,
    secp256k1::curve::{Affine, Field, Scalar},
    ContractProof,
};
use serde::{Deserialize, Serialize};

/// Contract proof as it travels over the RPC edge: every field hex encoded,
/// points as 64-byte coordinate pairs, plus the derived output `y` for
/// consumers that only want the randomness.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ContractProofJson {
    /// Public key coordinates
    pub public_key: String,
    /// Gamma coordinates
    pub gamma: String,
    /// Challenge
    pub c: String,
    /// Response
    pub s: String,
    /// Seed the proof was made over
    pub seed: String,
    /// Address commitment to u
    pub u_witness: String,
    /// c * gamma
    pub c_gamma_witness: String,
    /// s * H
    pub s_hash_witness: String,
    /// Inverse of the projective z
    pub z_inv: String,
    /// Published random output
    pub y: String,
}

impl From<&ContractProof> for ContractProofJson {
    fn from(value: &ContractProof) -> Self {
        ContractProofJson {
            public_key: value.pk.to_hex_string(),
            gamma: value.gamma.to_hex_string(),
            c: hex::encode(value.c.b32()),
            s: hex::encode(value.s.b32()),
            seed: hex::encode(value.seed.b32()),
            u_witness: hex::encode(value.u_witness),
            c_gamma_witness: value.c_gamma_witness.to_hex_string(),
            s_hash_witness: value.s_hash_witness.to_hex_string(),
            z_inv: hex::encode(value.z_inv.b32()),
            y: hex::encode(output_hash(&value.gamma).b32()),
        }
    }
}

fn strip(text: &str) -> &str {
    text.trim_start_matches("0x").trim_start_matches("0X")
}

fn decode_bytes32(text: &str) -> Result<[u8; 32], Error> {
    let mut buf = [0u8; 32];
    hex::decode_to_slice(strip(text), &mut buf)
        .map_err(|_| Error("INVALID_PROOF", "Expected 32 bytes of hex"))?;
    Ok(buf)
}

fn decode_scalar(text: &str) -> Result<Scalar, Error> {
    Ok(Scalar::from_bytes(&decode_bytes32(text)?))
}

fn decode_field(text: &str) -> Result<Field, Error> {
    let bytes = decode_bytes32(text)?;
    let mut f = Field::default();
    if !f.set_b32(&bytes) {
        f.normalize();
    }
    Ok(f)
}

fn decode_affine(text: &str) -> Result<Affine, Error> {
    let stripped = strip(text);
    if stripped.len() != 128 {
        return Err(Error("INVALID_PROOF", "Expected 64 bytes of hex"));
    }
    let x = decode_field(&stripped[0..64])?;
    let y = decode_field(&stripped[64..128])?;
    Ok(Affine::compose(&x, &y))
}

fn decode_address(text: &str) -> Result<[u8; 20], Error> {
    let mut buf = [0u8; 20];
    hex::decode_to_slice(strip(text), &mut buf)
        .map_err(|_| Error("INVALID_PROOF", "Expected 20 bytes of hex"))?;
    Ok(buf)
}

impl TryFrom<&ContractProofJson> for ContractProof {
    type Error = Error;

    fn try_from(value: &ContractProofJson) -> Result<Self, Self::Error> {
        Ok(ContractProof {
            pk: decode_affine(&value.public_key)?,
            gamma: decode_affine(&value.gamma)?,
            c: decode_scalar(&value.c)?,
            s: decode_scalar(&value.s)?,
            seed: decode_scalar(&value.seed)?,
            u_witness: decode_address(&value.u_witness)?,
            c_gamma_witness: decode_affine(&value.c_gamma_witness)?,
            s_hash_witness: decode_affine(&value.s_hash_witness)?,
            z_inv: decode_field(&value.z_inv)?,
        })
    }
}
