//! Error types for the uDMA driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Initialization, state and control table placement failures
//! - [`TransferError`]: Rejected transfer requests
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and initialization errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Driver already initialized
    AlreadyInitialized,
    /// Driver not initialized
    NotInitialized,
    /// No aligned control table fits inside the supplied buffer
    TableNotFound,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::AlreadyInitialized => "already initialized",
            ConfigError::NotInitialized => "not initialized",
            ConfigError::TableNotFound => "no aligned control table in buffer",
        }
    }
}

// =============================================================================
// Transfer Errors
// =============================================================================

/// Transfer request errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// Item count is zero or exceeds the 1024-item limit
    InvalidLength,
}

impl core::fmt::Display for TransferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TransferError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransferError::InvalidLength => "invalid transfer length",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::NotInitialized)) => { /* ... */ }
///     Err(Error::Transfer(TransferError::InvalidLength)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// Transfer error
    Transfer(TransferError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Transfer(e) => write!(f, "transfer: {}", e.as_str()),
        }
    }
}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<TransferError> for Error {
    fn from(e: TransferError) -> Self {
        Error::Transfer(e)
    }
}

/// Result type alias for uDMA operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for transfer operations
pub type TransferResult<T> = core::result::Result<T, TransferError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn config_error_as_str_non_empty() {
        let variants = [
            ConfigError::AlreadyInitialized,
            ConfigError::NotInitialized,
            ConfigError::TableNotFound,
        ];

        for variant in variants {
            let s = variant.as_str();
            assert!(!s.is_empty(), "ConfigError::{:?} has empty string", variant);
        }
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NotInitialized;
        assert_eq!(format!("{}", err), "not initialized");
    }

    #[test]
    fn transfer_error_display() {
        let err = TransferError::InvalidLength;
        assert_eq!(format!("{}", err), "invalid transfer length");
    }

    #[test]
    fn unified_error_display_prefixes_domain() {
        let err: Error = ConfigError::AlreadyInitialized.into();
        assert_eq!(format!("{}", err), "config: already initialized");

        let err: Error = TransferError::InvalidLength.into();
        assert_eq!(format!("{}", err), "transfer: invalid transfer length");
    }

    #[test]
    fn from_conversions() {
        assert_eq!(
            Error::from(ConfigError::TableNotFound),
            Error::Config(ConfigError::TableNotFound)
        );
        assert_eq!(
            Error::from(TransferError::InvalidLength),
            Error::Transfer(TransferError::InvalidLength)
        );
    }

    #[test]
    fn question_mark_converts() {
        fn inner() -> TransferResult<()> {
            Err(TransferError::InvalidLength)
        }
        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }
        assert_eq!(outer(), Err(Error::Transfer(TransferError::InvalidLength)));
    }
}
