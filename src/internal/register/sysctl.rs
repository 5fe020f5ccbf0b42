//! System Control Register Definitions
//!
//! Only the two registers the uDMA driver touches: run-mode clock gating and
//! the peripheral-ready status.

use super::{SYSCTL_BASE, clear_bits, reg_ro, set_bits};
use crate::hal::bus::RegisterBus;

/// uDMA Run Mode Clock Gating Control register offset
pub const RCGCDMA_OFFSET: usize = 0x60C;
/// uDMA Peripheral Ready register offset
pub const PRDMA_OFFSET: usize = 0xA0C;

/// uDMA clock enable bit in RCGCDMA
pub const RCGCDMA_R0: u32 = 1 << 0;
/// uDMA ready bit in PRDMA
pub const PRDMA_R0: u32 = 1 << 0;

/// System Control register block for type-safe access
pub struct SysCtlRegs;

impl SysCtlRegs {
    reg_ro!(clock_gating, SYSCTL_BASE, RCGCDMA_OFFSET, "uDMA Run Mode Clock Gating Control register");
    reg_ro!(peripheral_ready, SYSCTL_BASE, PRDMA_OFFSET, "uDMA Peripheral Ready register");

    /// Check whether the uDMA clock is ungated
    #[inline(always)]
    pub fn is_clock_enabled<B: RegisterBus>(bus: &B) -> bool {
        (Self::clock_gating(bus) & RCGCDMA_R0) != 0
    }

    /// Ungate the uDMA clock
    #[inline(always)]
    pub fn enable_clock<B: RegisterBus>(bus: &mut B) {
        set_bits(bus, SYSCTL_BASE + RCGCDMA_OFFSET, RCGCDMA_R0);
    }

    /// Gate the uDMA clock
    #[inline(always)]
    pub fn disable_clock<B: RegisterBus>(bus: &mut B) {
        clear_bits(bus, SYSCTL_BASE + RCGCDMA_OFFSET, RCGCDMA_R0);
    }

    /// Check whether the uDMA peripheral reports ready
    #[inline(always)]
    pub fn is_ready<B: RegisterBus>(bus: &B) -> bool {
        (Self::peripheral_ready(bus) & PRDMA_R0) != 0
    }
}
