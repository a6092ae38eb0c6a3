/// Lib VRF error
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    /// Ran out of retries while sampling a scalar below the group order
    RetriesExceeded,
    /// Hash-to-curve gave up before finding a valid curve point
    HashToCurveFailed,
    /// Proof bytes do not decode to valid field or group elements
    InvalidProofEncoding,
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::RetriesExceeded => write!(f, "Retries exceeded"),
            Error::HashToCurveFailed => write!(f, "Hash to curve failed"),
            Error::InvalidProofEncoding => write!(f, "Invalid proof encoding"),
        }
    }
}
