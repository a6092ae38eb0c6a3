use libvrf::{helper::hash_of_key, KeyPair, ECVRF};
use std::sync::Arc;

/// Everything a request handler needs: the proving key pair, the engine
/// built from it, and the key identifier consumers correlate proofs by.
pub struct NodeContext {
    ecvrf: ECVRF<'static>,
    keypair: KeyPair,
    key_hash: [u8; 32],
}

impl NodeContext {
    /// Create a new instance of node context
    pub fn new(keypair: KeyPair) -> Arc<Self> {
        let ecvrf = ECVRF::new(keypair.secret_key);
        let key_hash = hash_of_key(&keypair.public_key);
        Arc::new(Self {
            ecvrf,
            keypair,
            key_hash,
        })
    }

    /// Get keypair
    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    /// Get ECVRF instance
    pub fn ecvrf(&self) -> &ECVRF<'static> {
        &self.ecvrf
    }

    /// Identifier of the proving key
    pub fn key_hash(&self) -> &[u8; 32] {
        &self.key_hash
    }
}
