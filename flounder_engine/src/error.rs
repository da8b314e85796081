//! Error types for the Flounder engine
//!
//! Every GPU-facing operation in the engine is fail-fast: a platform call
//! that does not succeed aborts the current step and surfaces one of these
//! errors to the startup/resize path. Nothing here is retried.

use std::fmt;

/// Result type for Flounder engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Flounder engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A platform (Vulkan) creation or query call returned a non-success code
    PlatformCallFailed(String),

    /// Out of host or device memory
    OutOfMemory,

    /// A resource tier was created or destroyed out of dependency order
    OrderingViolation(String),

    /// A capability sequence the platform must never leave empty arrived empty
    ConfigurationExhausted(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PlatformCallFailed(msg) => write!(f, "Platform call failed: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::OrderingViolation(msg) => write!(f, "Ordering violation: {}", msg),
            Error::ConfigurationExhausted(msg) => write!(f, "Configuration exhausted: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
