//! Clock Gating HAL
//!
//! The uDMA module sits behind a run-mode clock gate in the System Control
//! block. Until the gate is opened every uDMA register access faults.

use crate::hal::bus::RegisterBus;
use crate::internal::constants::CLOCK_SETTLE_ITERATIONS;
use crate::internal::register::sysctl::SysCtlRegs;

/// Clock configuration state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockState {
    /// Clock not configured
    #[default]
    Unconfigured,
    /// Clock enabled
    Enabled,
    /// Clock disabled
    Disabled,
}

/// Clock controller for the uDMA peripheral
#[derive(Debug)]
pub struct ClockController {
    state: ClockState,
    settle_iterations: u32,
}

impl ClockController {
    /// Create a new clock controller
    pub const fn new() -> Self {
        Self {
            state: ClockState::Unconfigured,
            settle_iterations: CLOCK_SETTLE_ITERATIONS,
        }
    }

    /// Create a clock controller with a custom settle loop length
    pub const fn with_settle_iterations(iterations: u32) -> Self {
        Self {
            state: ClockState::Unconfigured,
            settle_iterations: iterations,
        }
    }

    /// Ungate the uDMA clock
    ///
    /// The gate bit is only written when it is not already set. A fixed
    /// busy-wait follows in every case so the module is out of reset before
    /// its registers are touched.
    pub fn enable<B: RegisterBus>(&mut self, bus: &mut B) {
        if !SysCtlRegs::is_clock_enabled(bus) {
            SysCtlRegs::enable_clock(bus);
        }
        settle(self.settle_iterations);
        self.state = ClockState::Enabled;
    }

    /// Gate the uDMA clock
    pub fn disable<B: RegisterBus>(&mut self, bus: &mut B) {
        SysCtlRegs::disable_clock(bus);
        self.state = ClockState::Disabled;
    }

    /// Check whether the peripheral reports ready (PRDMA)
    pub fn is_ready<B: RegisterBus>(&self, bus: &B) -> bool {
        SysCtlRegs::is_ready(bus)
    }

    /// Check if clocks are enabled
    pub fn is_enabled(&self) -> bool {
        self.state == ClockState::Enabled
    }

    /// Get current clock state
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Length of the settle loop
    pub fn settle_iterations(&self) -> u32 {
        self.settle_iterations
    }
}

impl Default for ClockController {
    fn default() -> Self {
        Self::new()
    }
}

/// Busy-wait for a fixed number of iterations
#[inline(never)]
fn settle(iterations: u32) {
    let mut remaining = iterations;
    while core::hint::black_box(remaining) != 0 {
        core::hint::spin_loop();
        remaining -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::register::SYSCTL_BASE;
    use crate::internal::register::sysctl::{RCGCDMA_OFFSET, RCGCDMA_R0};
    use crate::test_utils::MockBus;

    #[test]
    fn enable_sets_gate_bit() {
        let mut bus = MockBus::new();
        let mut clock = ClockController::with_settle_iterations(4);

        clock.enable(&mut bus);

        assert!(SysCtlRegs::is_clock_enabled(&bus));
        assert!(clock.is_enabled());
        assert_eq!(clock.state(), ClockState::Enabled);
    }

    #[test]
    fn enable_skips_write_when_already_ungated() {
        let mut bus = MockBus::new();
        bus.set_register(SYSCTL_BASE + RCGCDMA_OFFSET, RCGCDMA_R0 | 0x100);
        let mut clock = ClockController::with_settle_iterations(0);

        clock.enable(&mut bus);

        assert_eq!(bus.writes_to(SYSCTL_BASE + RCGCDMA_OFFSET), 0);
        assert_eq!(bus.register(SYSCTL_BASE + RCGCDMA_OFFSET), RCGCDMA_R0 | 0x100);
    }

    #[test]
    fn enable_preserves_other_gate_bits() {
        let mut bus = MockBus::new();
        bus.set_register(SYSCTL_BASE + RCGCDMA_OFFSET, 0x100);
        let mut clock = ClockController::with_settle_iterations(0);

        clock.enable(&mut bus);

        assert_eq!(bus.register(SYSCTL_BASE + RCGCDMA_OFFSET), 0x101);
    }

    #[test]
    fn disable_clears_gate_bit() {
        let mut bus = MockBus::new();
        let mut clock = ClockController::with_settle_iterations(0);
        clock.enable(&mut bus);

        clock.disable(&mut bus);

        assert!(!SysCtlRegs::is_clock_enabled(&bus));
        assert_eq!(clock.state(), ClockState::Disabled);
    }

    #[test]
    fn ready_follows_prdma() {
        let mut bus = MockBus::new();
        let clock = ClockController::new();
        assert!(!clock.is_ready(&bus));
        bus.set_peripheral_ready(true);
        assert!(clock.is_ready(&bus));
    }

    #[test]
    fn default_settle_length() {
        assert_eq!(ClockController::default().settle_iterations(), 0xFFFF);
    }
}
