use crate::types::{Address, RandomWordsRequest};
use ethnum::U256;

/// Coordinator side failure, a code and a human readable reason
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CoordinatorError(pub &'static str, pub &'static str);

impl CoordinatorError {
    /// Get error code
    pub fn code(&self) -> &'static str {
        self.0
    }

    /// Get error reason
    pub fn reason(&self) -> &'static str {
        self.1
    }
}

impl std::error::Error for CoordinatorError {}

impl core::fmt::Display for CoordinatorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Code [{}]: {}", self.0, self.1)
    }
}

/// The external component that schedules oracle-side fulfillment and pays
/// for it from a funded subscription. This crate only speaks to it; the
/// implementation lives with the oracle network.
pub trait Coordinator {
    /// The address fulfillment calls will come from
    fn address(&self) -> Address;

    /// Schedule a randomness request, returning the coordinator request id
    fn request_random_words(
        &mut self,
        request: &RandomWordsRequest,
    ) -> Result<U256, CoordinatorError>;

    /// Open a funding subscription
    fn create_subscription(&mut self) -> Result<u64, CoordinatorError>;

    /// Close a subscription, sending remaining funds to the receiver
    fn cancel_subscription(
        &mut self,
        sub_id: u64,
        receiver: Address,
    ) -> Result<(), CoordinatorError>;

    /// Move funds into a subscription
    fn fund_subscription(&mut self, sub_id: u64, amount: u128) -> Result<(), CoordinatorError>;
}
