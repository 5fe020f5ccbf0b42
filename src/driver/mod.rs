//! Core driver components for the TM4C123 uDMA controller.
//!
//! - [`config`] - Channel identifiers and the static channel configuration
//! - [`error`] - Error types and result aliases
//! - [`table`] - Channel control table layout and control word encoding
//! - [`udma`] - The main uDMA driver
//!
//! # Example
//!
//! ```ignore
//! use tm4c_udma::driver::{ArbitrationSize, Channel, ChannelConfig, RequestType};
//!
//! static CHANNELS: [ChannelConfig; 2] = [
//!     ChannelConfig::new(Channel::at(8)).with_arbitration_size(ArbitrationSize::Items8),
//!     ChannelConfig::new(Channel::at(9)).with_arbitration_size(ArbitrationSize::Items8),
//! ];
//! ```

// Submodules
pub mod config;
pub mod error;
pub mod table;
pub mod udma;

// Re-exports for convenience
pub use config::{
    ArbitrationSize, Channel, ChannelConfig, Encoding, Increment, ItemSize, Priority, RequestType,
    State, TransferMode,
};
pub use error::{ConfigError, ConfigResult, Error, Result, TransferError, TransferResult};
pub use table::{ChannelControlEntry, ControlTable, ControlWord, locate_table};
pub use udma::{ControllerStatus, Udma};
