use crate::types::Address;
use ethnum::U256;

/// Everything observers of the manager care about. Drained through
/// [crate::VrfManager::take_events].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ManagerEvent {
    /// A requester was registered
    VrfRequesterAdded {
        /// Registered address
        requester: Address,
        /// Its pending-time budget
        max_vrf_pending_time: u64,
    },
    /// A requester was removed
    VrfRequesterRemoved {
        /// Removed address
        requester: Address,
    },
    /// A requester's pending-time budget changed
    MaxVrfPendingTimeChanged {
        /// Affected address
        requester: Address,
        /// New budget
        max_vrf_pending_time: u64,
    },
    /// An expired request was reissued under a new coordinator id
    VrfRequestRetried {
        /// Id the request was stored under before
        old_request_id: U256,
        /// Id it is stored under now
        new_request_id: U256,
    },
    /// Request configuration changed
    ConfigChanged {
        /// New proving key identifier
        key_hash: [u8; 32],
        /// New confirmation count
        request_confirmations: u16,
        /// New callback gas budget
        callback_gas_limit: u32,
    },
    /// The coordinator reference was migrated
    CoordinatorChanged {
        /// Coordinator before the change
        previous_coordinator: Address,
        /// Coordinator after the change
        new_coordinator: Address,
    },
    /// A funding subscription was opened
    Subscribed {
        /// Assigned subscription id
        sub_id: u64,
    },
    /// The funding subscription was closed
    Unsubscribed {
        /// Closed subscription id
        sub_id: u64,
        /// Where remaining funds went
        receiver: Address,
    },
    /// Accrued balance was forwarded into the subscription
    SubscriptionToppedUp {
        /// Funded subscription id
        sub_id: u64,
        /// Forwarded amount
        amount: u128,
    },
    /// Requests are rejected from now on
    ManagerPaused,
    /// Requests are accepted again
    ManagerUnpaused,
}
