//! Centralized Constants
//!
//! Single source of truth for the sizes and counts used throughout the uDMA
//! driver.
//!
//! # Note
//!
//! Hardware register bit definitions remain in their respective modules
//! (`register/udma.rs`, `register/sysctl.rs`) and control-word bit fields in
//! `driver/table.rs`.

// =============================================================================
// Channel and Table Geometry
// =============================================================================

/// Number of uDMA channels on the TM4C123
pub const CHANNEL_COUNT: usize = 32;

/// Size of one channel control structure (source end, destination end,
/// control word, reserved)
pub const CONTROL_ENTRY_SIZE: usize = 16;

/// Size of the full control table: one primary and one alternate structure
/// per channel
pub const CONTROL_TABLE_SIZE: usize = CHANNEL_COUNT * CONTROL_ENTRY_SIZE * 2;

/// Required alignment of the control table base address
pub const CONTROL_TABLE_ALIGNMENT: usize = CONTROL_TABLE_SIZE;

// =============================================================================
// Transfer Limits
// =============================================================================

/// Maximum number of items in one basic/auto transfer (10-bit size field,
/// encoded as count minus one)
pub const MAX_TRANSFER_ITEMS: u16 = 1024;

// =============================================================================
// Timing Constants
// =============================================================================

/// Busy-wait iterations after ungating the uDMA clock
pub const CLOCK_SETTLE_ITERATIONS: u32 = 0xFFFF;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_geometry() {
        assert_eq!(CONTROL_TABLE_SIZE, 1024);
        assert!(CONTROL_TABLE_ALIGNMENT.is_power_of_two());
    }
}
