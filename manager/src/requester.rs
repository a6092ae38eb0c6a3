use crate::types::Address;
use ethnum::U256;

/// Requester side failure
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RequesterError {
    /// Callback invoked by something other than the configured manager
    ManagerForbidden,
    /// The consumer rejected the delivery
    Rejected(&'static str),
}

impl std::error::Error for RequesterError {}

impl core::fmt::Display for RequesterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RequesterError::ManagerForbidden => {
                write!(f, "VRFRequester/managerForbidden: caller is not the VRF manager")
            }
            RequesterError::Rejected(reason) => {
                write!(f, "VRFRequester/rejected: {}", reason)
            }
        }
    }
}

/// The minimal contract a randomness consumer implements. The `caller` is
/// whoever invoked the callback; implementations gate on it through
/// [RequesterBase::ensure_manager].
pub trait VrfConsumer {
    /// Receive the random words for a request this consumer made earlier.
    /// `id` is the original logical request id, stable across retries.
    fn fulfill_vrf(
        &mut self,
        caller: Address,
        id: U256,
        random_words: &[U256],
    ) -> Result<(), RequesterError>;
}

/// How the embedding runtime routes a fulfillment callback from the manager
/// to the consumer registered at an address.
pub trait Dispatcher {
    /// Deliver random words to the consumer at `requester`
    fn fulfill_vrf(
        &mut self,
        manager: Address,
        requester: Address,
        id: U256,
        random_words: &[U256],
    ) -> Result<(), RequesterError>;
}

/// Event a requester emits when it is pointed at a different manager
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct VrfManagerChanged {
    /// Manager before the change
    pub previous_manager_address: Address,
    /// Manager after the change
    pub new_manager_address: Address,
}

/// State every consumer embeds: the reference to the current manager, the
/// gate that keeps everyone else out of the callback, and the ability to be
/// swapped between managers.
#[derive(Debug, Default)]
pub struct RequesterBase {
    manager: Address,
    events: Vec<VrfManagerChanged>,
}

impl RequesterBase {
    /// Create a base pointing at a manager
    pub fn new(manager: Address) -> Self {
        RequesterBase {
            manager,
            events: Vec::new(),
        }
    }

    /// The currently configured manager
    pub fn manager(&self) -> Address {
        self.manager
    }

    /// Point this requester at a different manager
    pub fn change_vrf_manager(&mut self, new_manager: Address) {
        let previous = self.manager;
        self.manager = new_manager;
        log::info!("requester manager changed {} -> {}", previous, new_manager);
        self.events.push(VrfManagerChanged {
            previous_manager_address: previous,
            new_manager_address: new_manager,
        });
    }

    /// Reject callbacks from anything but the configured manager
    pub fn ensure_manager(&self, caller: Address) -> Result<(), RequesterError> {
        if caller != self.manager {
            return Err(RequesterError::ManagerForbidden);
        }
        Ok(())
    }

    /// Drain emitted events
    pub fn take_events(&mut self) -> Vec<VrfManagerChanged> {
        core::mem::take(&mut self.events)
    }
}
