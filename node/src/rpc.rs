use crate::error::Error;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
/// JSON RPC Payload
pub struct JSONRPCPayload {
    method: String,
    params: Vec<serde_json::Value>,
}

/// JSON RPC Method
pub enum JSONRPCMethod {
    /// Public key, address and key hash of this oracle
    VrfGetPublicKey,
    /// Produce a contract verifiable proof over the given seed (hex)
    VrfNewProof([u8; 32]),
    /// Check a contract verifiable proof produced by this oracle
    VrfVerifyProof(serde_json::Value),
}

fn decode_seed(val: &serde_json::Value) -> Result<[u8; 32], Error> {
    let text = val
        .as_str()
        .ok_or(Error("INVALID_SEED", "Seed must be a hex string"))?;
    let regex_seed = Regex::new(r#"^(0x)?[a-fA-F0-9]{64}$"#).expect("Unable to init Regex");
    if !regex_seed.is_match(text) {
        return Err(Error("INVALID_SEED", "Seed must be 32 bytes of hex"));
    }
    let stripped = text.trim_start_matches("0x").trim_start_matches("0X");
    let mut buf = [0u8; 32];
    hex::decode_to_slice(stripped, &mut buf)
        .map_err(|_| Error("INVALID_SEED", "Seed must be 32 bytes of hex"))?;
    Ok(buf)
}

impl JSONRPCMethod {
    /// Create new instance of JSONRPCMethod from JSON string
    pub fn from_json_string(json_string: &str) -> Result<Self, Error> {
        let json_rpc: JSONRPCPayload = match serde_json::from_str(json_string) {
            Ok(json_rpc) => json_rpc,
            Err(_) => return Err(Error("INVALID_JSON", "Invalid JSON")),
        };
        let result = match json_rpc.method.as_str() {
            "vrf_getPublicKey" => Self::VrfGetPublicKey,
            "vrf_newProof" => Self::VrfNewProof(decode_seed(
                json_rpc
                    .params
                    .first()
                    .ok_or(Error("INVALID_PARAMS", "Missing seed parameter"))?,
            )?),
            "vrf_verifyProof" => Self::VrfVerifyProof(
                json_rpc
                    .params
                    .first()
                    .ok_or(Error("INVALID_PARAMS", "Missing proof parameter"))?
                    .clone(),
            ),
            _ => return Err(Error("INVALID_METHOD", "Unsupported method")),
        };
        Ok(result)
    }
}
