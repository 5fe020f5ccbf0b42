//! TM4C123 uDMA Driver
//!
//! A `no_std`, `no_alloc` Rust driver for the micro Direct Memory Access
//! (uDMA) controller of the TI TM4C123 microcontroller family.
//!
//! The uDMA controller moves data between memory and peripherals without CPU
//! involvement. Each of its 32 channels is described by a 16-byte control
//! structure in a 1024-byte aligned table in SRAM; the controller reads that
//! table to learn where to copy from, where to copy to, how much and how.
//!
//! # Architecture
//!
//! 1. **Driver Layer** ([`driver`]): [`Udma`], channel configuration and the
//!    control table
//! 2. **HAL Layer** ([`hal`]): The [`RegisterBus`] seam and clock gating
//! 3. **Sync Layer** (`sync`, feature `critical-section`): ISR-safe sharing
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and defmt log events
//! - `log`: Emit log events through the `log` facade
//! - `critical-section`: Enable the ISR-safe `SharedUdma` wrapper
//!
//! # Example
//!
//! ```ignore
//! use tm4c_udma::{
//!     ArbitrationSize, Channel, ChannelConfig, ControlTable, Increment, ItemSize, Mmio, Udma,
//! };
//!
//! static CHANNELS: [ChannelConfig; 2] = [
//!     ChannelConfig::new(Channel::at(8)).with_arbitration_size(ArbitrationSize::Items8),
//!     ChannelConfig::new(Channel::at(9)).with_arbitration_size(ArbitrationSize::Items8),
//! ];
//!
//! let table = ControlTable::take().unwrap();
//! let mut udma = Udma::new(Mmio::take().unwrap(), table);
//! udma.init(&CHANNELS).unwrap();
//!
//! // UART0 RX -> buffer
//! let ch = Channel::at(8);
//! udma.configure_source(ch, UART0_DR, ItemSize::Byte, Increment::None);
//! udma.configure_destination(ch, buf_end, ItemSize::Byte, Increment::Byte);
//! udma.start_transfer(ch, 64).unwrap();
//! ```
//!
//! # Memory Requirements
//!
//! One [`ControlTable`] of 1024 bytes, aligned to 1024 bytes.
//! [`ControlTable::take`] hands out the crate's statically allocated table.
//!
//! A host-runnable walkthrough lives in `demos/udma_cfg.rs`
//! (`cargo run --example udma_cfg`).

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub(crate) mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{
    ArbitrationSize, Channel, ChannelConfig, Encoding, Increment, ItemSize, Priority, RequestType,
    State, TransferMode,
};
pub use driver::error::{
    ConfigError, ConfigResult, Error, Result, TransferError, TransferResult,
};
pub use driver::table::{ChannelControlEntry, ControlTable, ControlWord, locate_table};
pub use driver::udma::{ControllerStatus, Udma};
pub use hal::bus::{Mmio, RegisterBus};
pub use hal::clock::{ClockController, ClockState};
pub use internal::register::udma::ControllerState;

/// Low-level register accessors for advanced use.
///
/// # Safety
///
/// Direct register access bypasses driver invariants. Use only if you fully
/// understand the TM4C123 uDMA hardware and accept responsibility for correct
/// sequencing and synchronization.
pub mod unsafe_registers {
    pub use crate::internal::register::sysctl::SysCtlRegs;
    pub use crate::internal::register::udma::UdmaRegs;
    pub use crate::internal::register::{SYSCTL_BASE, UDMA_BASE};
}

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{SharedUdma, SharedUdmaMmio};

/// Shared driver constants.
pub mod constants {
    pub use crate::internal::constants::{
        CHANNEL_COUNT, CLOCK_SETTLE_ITERATIONS, CONTROL_ENTRY_SIZE, CONTROL_TABLE_ALIGNMENT,
        CONTROL_TABLE_SIZE, MAX_TRANSFER_ITEMS,
    };
}

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare a static ISR-safe driver slot.
///
/// The control table is not part of the slot; take it with
/// [`ControlTable::take`] and hand it to the driver.
///
/// # Examples
///
/// ```ignore
/// tm4c_udma::udma_static!(UDMA);
///
/// let table = ControlTable::take().unwrap();
/// let mut udma = Udma::new(Mmio::take().unwrap(), table);
/// udma.init(&CHANNELS).unwrap();
/// UDMA.install(udma);
/// ```
#[cfg(feature = "critical-section")]
#[macro_export]
macro_rules! udma_static {
    ($udma:ident) => {
        static $udma: $crate::sync::SharedUdmaMmio = $crate::sync::SharedUdmaMmio::new();
    };
}
