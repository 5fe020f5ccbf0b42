//! Synchronization and Concurrency Support
//!
//! - **Primitives** (`primitives`): [`CriticalSectionCell`], ISR-safe
//!   interior mutability
//! - **Shared Wrapper** (`shared`): [`SharedUdma`], a static slot for the
//!   driver reachable from interrupt handlers
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module
//!
//! # Example
//!
//! ```ignore
//! use tm4c_udma::sync::SharedUdmaMmio;
//!
//! static UDMA: SharedUdmaMmio = SharedUdmaMmio::new();
//!
//! #[interrupt]
//! fn UDMAERR() {
//!     UDMA.with(|udma| udma.clear_bus_error());
//! }
//! ```

mod primitives;

pub use primitives::CriticalSectionCell;

mod shared;

pub use shared::{SharedUdma, SharedUdmaMmio};
