//! Memory-mapped register definitions for the TM4C123 uDMA controller
//!
//! This module provides type-safe access to the uDMA and System Control
//! registers. Every access goes through a [`RegisterBus`], so the same
//! accessors drive real hardware ([`Mmio`](crate::hal::bus::Mmio)) and the
//! host-side mock used by the unit tests.

use crate::hal::bus::RegisterBus;

pub mod sysctl;
pub mod udma;

/// uDMA register block base address
pub const UDMA_BASE: usize = 0x400F_F000;

/// System Control register block base address
pub const SYSCTL_BASE: usize = 0x400F_E000;

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

/// Set bits in a register (read-modify-write)
#[inline(always)]
pub fn set_bits<B: RegisterBus>(bus: &mut B, addr: usize, bits: u32) {
    bus.modify(addr, |v| v | bits);
}

/// Clear bits in a register (read-modify-write)
#[inline(always)]
pub fn clear_bits<B: RegisterBus>(bus: &mut B, addr: usize, bits: u32) {
    bus.modify(addr, |v| v & !bits);
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate read/write accessor methods for a register.
///
/// # Example
/// ```ignore
/// impl UdmaRegs {
///     reg_rw!(control_base, set_control_base, UDMA_BASE, DMACTLBASE_OFFSET,
///             "Channel Control Base Pointer register");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $base:expr, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn<B: $crate::hal::bus::RegisterBus>(bus: &B) -> u32 {
            bus.read($base + $offset)
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn<B: $crate::hal::bus::RegisterBus>(bus: &mut B, value: u32) {
            bus.write($base + $offset, value);
        }
    };
}

/// Generate a read-only accessor method for a register.
macro_rules! reg_ro {
    ($read_fn:ident, $base:expr, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn<B: $crate::hal::bus::RegisterBus>(bus: &B) -> u32 {
            bus.read($base + $offset)
        }
    };
}

/// Generate a write-only accessor method for a register.
macro_rules! reg_wo {
    ($write_fn:ident, $base:expr, $offset:expr, $doc:expr) => {
        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn<B: $crate::hal::bus::RegisterBus>(bus: &mut B, value: u32) {
            bus.write($base + $offset, value);
        }
    };
}

/// Generate set/clear methods for a per-channel set/clear register pair.
///
/// The hardware only acts on the `1` bits written, so these are plain writes
/// and never read-modify-write. The status of the whole bank is read back
/// through the SET register.
///
/// # Example
/// ```ignore
/// impl UdmaRegs {
///     reg_channel_pair!(enable_channels, disable_channels, enabled_channels,
///                       UDMA_BASE, DMAENASET_OFFSET, DMAENACLR_OFFSET, "channel enable");
/// }
/// ```
macro_rules! reg_channel_pair {
    ($set_fn:ident, $clear_fn:ident, $read_fn:ident, $base:expr, $set_offset:expr, $clear_offset:expr, $what:expr) => {
        #[doc = concat!("Set ", $what, " for every channel whose bit is set in `mask`")]
        #[inline(always)]
        pub fn $set_fn<B: $crate::hal::bus::RegisterBus>(bus: &mut B, mask: u32) {
            bus.write($base + $set_offset, mask);
        }

        #[doc = concat!("Clear ", $what, " for every channel whose bit is set in `mask`")]
        #[inline(always)]
        pub fn $clear_fn<B: $crate::hal::bus::RegisterBus>(bus: &mut B, mask: u32) {
            bus.write($base + $clear_offset, mask);
        }

        #[doc = concat!("Read the ", $what, " state of all channels")]
        #[inline(always)]
        pub fn $read_fn<B: $crate::hal::bus::RegisterBus>(bus: &B) -> u32 {
            bus.read($base + $set_offset)
        }
    };
}

// Export macros for use in submodules
pub(crate) use reg_channel_pair;
pub(crate) use reg_ro;
pub(crate) use reg_rw;
pub(crate) use reg_wo;
