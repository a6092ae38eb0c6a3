use ethnum::U256;

/// A 20-byte account address
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address
    pub const ZERO: Address = Address([0u8; 20]);

    /// Parse an address from a 0x-prefixed hex string
    pub fn from_hex(value: &str) -> Option<Self> {
        let stripped = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);
        let mut buf = [0u8; 20];
        hex::decode_to_slice(stripped, &mut buf).ok()?;
        Some(Address(buf))
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 20]> for Address {
    fn from(value: [u8; 20]) -> Self {
        Address(value)
    }
}

/// An outstanding randomness request, stored under its current coordinator
/// request id. `id` carries the first id ever issued for this logical
/// request, so a requester observes one continuous id across retries.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VrfRequest {
    /// Original logical request id
    pub id: U256,
    /// Timestamp after which the request may be retried
    pub deadline: u64,
    /// Number of random words requested
    pub num_words: u32,
    /// The registered component that asked for randomness
    pub requester: Address,
}

/// Registry entry of an authorized requester
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VrfRequesterInfo {
    /// How long a request of this requester may stay pending before anyone
    /// can retry it. Zero means requests of this requester never expire.
    pub max_vrf_pending_time: u64,
}

/// Process-wide request configuration, mutated only by the owner. The
/// subscription id is assigned once at subscribe time and survives every
/// later config update.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RequestConfig {
    /// Identifier of the oracle proving key
    pub key_hash: [u8; 32],
    /// Confirmations the coordinator waits for before fulfilling
    pub request_confirmations: u16,
    /// Gas budget the coordinator grants the fulfillment callback
    pub callback_gas_limit: u32,
    /// Funding subscription, assigned at subscribe time
    pub sub_id: Option<u64>,
}

/// Who may forward accrued balance into the subscription
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TopUpAccess {
    /// Only the owner
    OwnerOnly,
    /// The owner or the configured executor
    OwnerOrExecutor,
}

/// Behaviors that differ between deployments and are fixed at construction
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ManagerPolicy {
    /// Reject fulfillment of requests whose deadline has passed
    pub enforce_fulfillment_deadline: bool,
    /// Authorization rule for topping up the subscription
    pub top_up_access: TopUpAccess,
}

impl Default for ManagerPolicy {
    fn default() -> Self {
        ManagerPolicy {
            enforce_fulfillment_deadline: true,
            top_up_access: TopUpAccess::OwnerOnly,
        }
    }
}

/// The outbound randomness request handed to the coordinator
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RandomWordsRequest {
    /// Identifier of the oracle proving key
    pub key_hash: [u8; 32],
    /// Funding subscription
    pub sub_id: u64,
    /// Confirmations to wait for
    pub request_confirmations: u16,
    /// Gas budget for the callback
    pub callback_gas_limit: u32,
    /// Number of random words
    pub num_words: u32,
}
