//! Testing utilities and mock implementations
//!
//! This module provides a mock register bus for testing the uDMA driver on
//! the host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use std::collections::HashMap;
use std::vec::Vec;

use crate::hal::bus::RegisterBus;
use crate::internal::register::sysctl::{PRDMA_OFFSET, PRDMA_R0};
use crate::internal::register::udma::{
    DMAALTBASE_OFFSET, DMAALTCLR_OFFSET, DMAALTSET_OFFSET, DMACFG_MASTEN, DMACFG_OFFSET,
    DMACTLBASE_OFFSET, DMAENACLR_OFFSET, DMAENASET_OFFSET, DMAERRCLR_ERRCLR, DMAERRCLR_OFFSET,
    DMAPRIOCLR_OFFSET, DMAPRIOSET_OFFSET, DMAREQMASKCLR_OFFSET, DMAREQMASKSET_OFFSET,
    DMASTAT_DMACHANS_SHIFT, DMASTAT_MASTEN, DMASTAT_OFFSET, DMASTAT_STATE_SHIFT,
    DMASWREQ_OFFSET, DMAUSEBURSTCLR_OFFSET, DMAUSEBURSTSET_OFFSET,
};
use crate::internal::register::{SYSCTL_BASE, UDMA_BASE};

/// SET/CLR register pairs, as (set offset, clear offset)
const CHANNEL_PAIRS: [(usize, usize); 5] = [
    (DMAUSEBURSTSET_OFFSET, DMAUSEBURSTCLR_OFFSET),
    (DMAREQMASKSET_OFFSET, DMAREQMASKCLR_OFFSET),
    (DMAENASET_OFFSET, DMAENACLR_OFFSET),
    (DMAALTSET_OFFSET, DMAALTCLR_OFFSET),
    (DMAPRIOSET_OFFSET, DMAPRIOCLR_OFFSET),
];

// =============================================================================
// Mock Register Bus
// =============================================================================

/// Mock register bus modelling the uDMA controller and its SYSCTL bits
///
/// - SET/CLR pairs keep one state word; writing `1`s to SET sets bits,
///   writing `1`s to CLR clears them, and either address reads the state.
/// - DMACFG feeds the master-enable bit of DMASTAT.
/// - DMAERRCLR reads the bus error flag and clears it on a `1` write.
/// - DMAALTBASE reads DMACTLBASE + 0x200.
/// - Every other address behaves as plain memory.
///
/// # Example
///
/// ```ignore
/// let mut bus = MockBus::new();
/// let mut table = ControlTable::new();
/// let mut udma = Udma::new(bus, &mut table);
/// udma.init(&CONFIGS).unwrap();
/// assert_eq!(udma.bus().register(UDMA_BASE + DMAENASET_OFFSET), 0);
/// ```
#[derive(Debug, Default)]
pub struct MockBus {
    /// Plain register values by absolute address
    registers: HashMap<usize, u32>,
    /// Record of writes: (address, value)
    write_log: Vec<(usize, u32)>,
    /// State of the DMASTAT control state machine field
    controller_state: u32,
    /// Bus error flag
    bus_error: bool,
    /// Accumulated software requests
    software_requests: u32,
}

impl MockBus {
    /// Create a new mock bus with every register at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Map an address to the SET address of its channel pair, if it is one
    fn pair_state_addr(addr: usize) -> Option<(usize, bool)> {
        let offset = addr.checked_sub(UDMA_BASE)?;
        CHANNEL_PAIRS.iter().find_map(|&(set, clr)| {
            if offset == set {
                Some((UDMA_BASE + set, true))
            } else if offset == clr {
                Some((UDMA_BASE + set, false))
            } else {
                None
            }
        })
    }

    /// Preset a register without logging a write
    ///
    /// For SET/CLR pairs this sets the shared state word.
    pub fn set_register(&mut self, addr: usize, value: u32) {
        let key = Self::pair_state_addr(addr).map_or(addr, |(set, _)| set);
        self.registers.insert(key, value);
    }

    /// Current register value, as the driver would read it
    pub fn register(&self, addr: usize) -> u32 {
        self.read(addr)
    }

    /// Get all writes that have been made
    pub fn writes(&self) -> &[(usize, u32)] {
        &self.write_log
    }

    /// Number of writes made to `addr`
    pub fn writes_to(&self, addr: usize) -> usize {
        self.write_log.iter().filter(|(a, _)| *a == addr).count()
    }

    /// Values written to `addr`, in order
    pub fn values_written_to(&self, addr: usize) -> Vec<u32> {
        self.write_log
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Clear the write log
    pub fn clear_writes(&mut self) {
        self.write_log.clear();
    }

    /// Set the PRDMA ready bit
    pub fn set_peripheral_ready(&mut self, ready: bool) {
        let value = if ready { PRDMA_R0 } else { 0 };
        self.registers.insert(SYSCTL_BASE + PRDMA_OFFSET, value);
    }

    /// Raise or drop the bus error flag
    pub fn set_bus_error(&mut self, error: bool) {
        self.bus_error = error;
    }

    /// Set the DMASTAT control state machine field
    pub fn set_controller_state(&mut self, state: u8) {
        self.controller_state = u32::from(state) & 0xF;
    }

    /// Channels that received a software request since creation
    pub fn software_requests(&self) -> u32 {
        self.software_requests
    }

    fn plain(&self, addr: usize) -> u32 {
        self.registers.get(&addr).copied().unwrap_or(0)
    }
}

impl RegisterBus for MockBus {
    fn read(&self, addr: usize) -> u32 {
        if let Some((set, _)) = Self::pair_state_addr(addr) {
            return self.plain(set);
        }

        match addr.wrapping_sub(UDMA_BASE) {
            DMASTAT_OFFSET => {
                let masten = if self.plain(UDMA_BASE + DMACFG_OFFSET) & DMACFG_MASTEN != 0 {
                    DMASTAT_MASTEN
                } else {
                    0
                };
                (31 << DMASTAT_DMACHANS_SHIFT)
                    | (self.controller_state << DMASTAT_STATE_SHIFT)
                    | masten
            }
            DMAALTBASE_OFFSET => self.plain(UDMA_BASE + DMACTLBASE_OFFSET).wrapping_add(0x200),
            DMAERRCLR_OFFSET => u32::from(self.bus_error),
            _ => self.plain(addr),
        }
    }

    fn write(&mut self, addr: usize, value: u32) {
        self.write_log.push((addr, value));

        if let Some((set, is_set)) = Self::pair_state_addr(addr) {
            let state = self.plain(set);
            let next = if is_set { state | value } else { state & !value };
            self.registers.insert(set, next);
            return;
        }

        match addr.wrapping_sub(UDMA_BASE) {
            DMAERRCLR_OFFSET => {
                if value & DMAERRCLR_ERRCLR != 0 {
                    self.bus_error = false;
                }
            }
            DMASWREQ_OFFSET => {
                self.software_requests |= value;
            }
            _ => {
                self.registers.insert(addr, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clear_pair_semantics() {
        let mut bus = MockBus::new();
        bus.write(UDMA_BASE + DMAENASET_OFFSET, 0b0110);
        bus.write(UDMA_BASE + DMAENASET_OFFSET, 0b1000);
        assert_eq!(bus.read(UDMA_BASE + DMAENASET_OFFSET), 0b1110);

        bus.write(UDMA_BASE + DMAENACLR_OFFSET, 0b0010);
        assert_eq!(bus.read(UDMA_BASE + DMAENASET_OFFSET), 0b1100);
        assert_eq!(bus.writes_to(UDMA_BASE + DMAENACLR_OFFSET), 1);
    }

    #[test]
    fn status_reflects_master_enable() {
        let mut bus = MockBus::new();
        assert_eq!(bus.read(UDMA_BASE + DMASTAT_OFFSET) & DMASTAT_MASTEN, 0);
        bus.write(UDMA_BASE + DMACFG_OFFSET, DMACFG_MASTEN);
        assert_ne!(bus.read(UDMA_BASE + DMASTAT_OFFSET) & DMASTAT_MASTEN, 0);
    }

    #[test]
    fn bus_error_clears_on_write() {
        let mut bus = MockBus::new();
        bus.set_bus_error(true);
        assert_eq!(bus.read(UDMA_BASE + DMAERRCLR_OFFSET), 1);
        bus.write(UDMA_BASE + DMAERRCLR_OFFSET, DMAERRCLR_ERRCLR);
        assert_eq!(bus.read(UDMA_BASE + DMAERRCLR_OFFSET), 0);
    }

    #[test]
    fn plain_memory_round_trip() {
        let mut bus = MockBus::new();
        bus.write(0x2000_0000, 0xCAFE);
        assert_eq!(bus.read(0x2000_0000), 0xCAFE);
        assert_eq!(bus.read(0x2000_0004), 0);
    }
}
