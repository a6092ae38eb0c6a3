use crate::coordinator::CoordinatorError;
use crate::requester::RequesterError;

/// Everything the manager can refuse to do, split the way callers need to
/// react: authorization failures are final, state conflicts mean the caller
/// should re-check and retry with corrected arguments.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    /// Caller is not a registered requester
    RequesterForbidden,
    /// No usable request under the given id, with the reason
    InvalidRequestId(&'static str),
    /// Registry conflict on add or remove, with the reason
    InvalidRequesterAddress(&'static str),
    /// Caller is not the owner
    OwnerForbidden,
    /// Caller is neither the owner nor the executor
    ExecutorForbidden,
    /// Only the coordinator may fulfill
    OnlyCoordinatorCanFulfill,
    /// Only the owner or the current coordinator may migrate
    OnlyOwnerOrCoordinator,
    /// Already subscribed
    SubscribeConflict,
    /// Not subscribed yet
    UnsubscribeConflict,
    /// Operation needs an active subscription
    NotSubscribed,
    /// Requests are rejected while paused
    Paused,
    /// Unpause of a manager that is not paused
    NotPaused,
    /// The requester callback reported failure
    CallbackFailed(RequesterError),
    /// The coordinator rejected an outbound call
    Coordinator(CoordinatorError),
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::RequesterForbidden => {
                write!(f, "VRFManager/requesterForbidden: caller is not the requester")
            }
            Error::InvalidRequestId(reason) => {
                write!(f, "VRFManager/invalidRequestId: {}", reason)
            }
            Error::InvalidRequesterAddress(reason) => {
                write!(f, "VRFManager/invalidRequesterAddress: {}", reason)
            }
            Error::OwnerForbidden => write!(f, "VRFManager/ownerForbidden: caller is not the owner"),
            Error::ExecutorForbidden => write!(
                f,
                "VRFManager/executorForbidden: caller is neither the owner nor an executor"
            ),
            Error::OnlyCoordinatorCanFulfill => write!(
                f,
                "VRFManager/coordinatorForbidden: only the coordinator can fulfill"
            ),
            Error::OnlyOwnerOrCoordinator => write!(
                f,
                "VRFManager/coordinatorForbidden: caller is neither the owner nor the coordinator"
            ),
            Error::SubscribeConflict => {
                write!(f, "VRFManager/subscribeConflict: already subscribed")
            }
            Error::UnsubscribeConflict => {
                write!(f, "VRFManager/unsubscribeConflict: not subscribed yet")
            }
            Error::NotSubscribed => {
                write!(f, "VRFManager/notSubscribed: no active subscription")
            }
            Error::Paused => write!(f, "Pausable: paused"),
            Error::NotPaused => write!(f, "Pausable: not paused"),
            Error::CallbackFailed(inner) => {
                write!(f, "VRFManager/callbackFailed: {}", inner)
            }
            Error::Coordinator(inner) => write!(f, "VRFManager/coordinator: {}", inner),
        }
    }
}

impl From<CoordinatorError> for Error {
    fn from(value: CoordinatorError) -> Self {
        Error::Coordinator(value)
    }
}
