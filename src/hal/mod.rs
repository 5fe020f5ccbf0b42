//! Hardware Abstraction Layer
//!
//! This module provides the pieces between the driver and raw memory:
//!
//! - [`bus`]: The [`RegisterBus`] trait and the real-hardware [`Mmio`] bus
//! - [`clock`]: uDMA clock gating
//!
//! # Bus Ownership
//!
//! [`Mmio::take`] hands out the hardware bus once. Everything that mutates the
//! controller borrows it mutably, so there is a single writer by construction.

pub mod bus;
pub mod clock;

// Re-export commonly used types
pub use bus::{Mmio, RegisterBus};
pub use clock::{ClockController, ClockState};
