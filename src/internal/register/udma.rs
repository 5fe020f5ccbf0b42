//! uDMA Controller Register Definitions
//!
//! The uDMA controller is an Arm PL230-derived engine. Most per-channel state
//! lives in SET/CLR register pairs: writing a `1` to the SET register sets the
//! channel's bit, writing a `1` to the CLR register clears it, and `0` bits are
//! ignored. Reading the SET register returns the current state.

use super::{UDMA_BASE, reg_channel_pair, reg_ro, reg_rw, reg_wo};
use crate::hal::bus::RegisterBus;

// =============================================================================
// Register Offsets
// =============================================================================

/// DMA Status register offset (read-only)
pub const DMASTAT_OFFSET: usize = 0x000;
/// DMA Configuration register offset (write-only)
pub const DMACFG_OFFSET: usize = 0x004;
/// DMA Channel Control Base Pointer register offset
pub const DMACTLBASE_OFFSET: usize = 0x008;
/// DMA Alternate Channel Control Base Pointer register offset (read-only)
pub const DMAALTBASE_OFFSET: usize = 0x00C;
/// DMA Channel Wait-on-Request Status register offset (read-only)
pub const DMAWAITSTAT_OFFSET: usize = 0x010;
/// DMA Channel Software Request register offset (write-only)
pub const DMASWREQ_OFFSET: usize = 0x014;
/// DMA Channel Useburst Set register offset
pub const DMAUSEBURSTSET_OFFSET: usize = 0x018;
/// DMA Channel Useburst Clear register offset
pub const DMAUSEBURSTCLR_OFFSET: usize = 0x01C;
/// DMA Channel Request Mask Set register offset
pub const DMAREQMASKSET_OFFSET: usize = 0x020;
/// DMA Channel Request Mask Clear register offset
pub const DMAREQMASKCLR_OFFSET: usize = 0x024;
/// DMA Channel Enable Set register offset
pub const DMAENASET_OFFSET: usize = 0x028;
/// DMA Channel Enable Clear register offset
pub const DMAENACLR_OFFSET: usize = 0x02C;
/// DMA Channel Primary Alternate Set register offset
pub const DMAALTSET_OFFSET: usize = 0x030;
/// DMA Channel Primary Alternate Clear register offset
pub const DMAALTCLR_OFFSET: usize = 0x034;
/// DMA Channel Priority Set register offset
pub const DMAPRIOSET_OFFSET: usize = 0x038;
/// DMA Channel Priority Clear register offset
pub const DMAPRIOCLR_OFFSET: usize = 0x03C;
/// DMA Bus Error Clear register offset
pub const DMAERRCLR_OFFSET: usize = 0x04C;
/// DMA Channel Assignment register offset
pub const DMACHASGN_OFFSET: usize = 0x500;
/// DMA Channel Map Select 0 register offset (channels 0-7)
pub const DMACHMAP0_OFFSET: usize = 0x510;
/// DMA Channel Map Select 1 register offset (channels 8-15)
pub const DMACHMAP1_OFFSET: usize = 0x514;
/// DMA Channel Map Select 2 register offset (channels 16-23)
pub const DMACHMAP2_OFFSET: usize = 0x518;
/// DMA Channel Map Select 3 register offset (channels 24-31)
pub const DMACHMAP3_OFFSET: usize = 0x51C;

// =============================================================================
// Status Register (DMASTAT) Bits
// =============================================================================

/// Master Enable Status
pub const DMASTAT_MASTEN: u32 = 1 << 0;
/// Control State Machine Status shift
pub const DMASTAT_STATE_SHIFT: u32 = 4;
/// Control State Machine Status mask
pub const DMASTAT_STATE_MASK: u32 = 0xF << 4;
/// Available uDMA Channels Minus 1 shift
pub const DMASTAT_DMACHANS_SHIFT: u32 = 16;
/// Available uDMA Channels Minus 1 mask
pub const DMASTAT_DMACHANS_MASK: u32 = 0x1F << 16;

// =============================================================================
// Configuration Register (DMACFG) Bits
// =============================================================================

/// Controller Master Enable
pub const DMACFG_MASTEN: u32 = 1 << 0;

// =============================================================================
// Bus Error Clear Register (DMAERRCLR) Bits
// =============================================================================

/// uDMA Bus Error Status (write 1 to clear)
pub const DMAERRCLR_ERRCLR: u32 = 1 << 0;

// =============================================================================
// Channel Map Select (DMACHMAPn) Layout
// =============================================================================

/// Width of one channel's encoding field in a DMACHMAPn register
pub const DMACHMAP_FIELD_BITS: u32 = 4;
/// Mask of one channel's encoding field, before shifting
pub const DMACHMAP_FIELD_MASK: u32 = 0xF;
/// Channels covered by one DMACHMAPn register
pub const DMACHMAP_CHANNELS_PER_REG: usize = 8;

/// DMACHMAPn offsets, indexed by `channel / DMACHMAP_CHANNELS_PER_REG`
pub const DMACHMAP_OFFSETS: [usize; 4] = [
    DMACHMAP0_OFFSET,
    DMACHMAP1_OFFSET,
    DMACHMAP2_OFFSET,
    DMACHMAP3_OFFSET,
];

/// Absolute address of the DMACHMAPn register holding `channel`
#[inline(always)]
pub const fn chmap_addr(channel: u8) -> usize {
    UDMA_BASE + DMACHMAP_OFFSETS[channel as usize / DMACHMAP_CHANNELS_PER_REG]
}

/// Bit shift of `channel`'s encoding field inside its DMACHMAPn register
#[inline(always)]
pub const fn chmap_shift(channel: u8) -> u32 {
    (channel as u32 % DMACHMAP_CHANNELS_PER_REG as u32) * DMACHMAP_FIELD_BITS
}

// =============================================================================
// uDMA Register Access Functions
// =============================================================================

/// uDMA register block for type-safe access
pub struct UdmaRegs;

impl UdmaRegs {
    /// Get the base address
    #[inline(always)]
    pub const fn base() -> usize {
        UDMA_BASE
    }

    // -------------------------------------------------------------------------
    // Register accessors (generated by macros)
    // -------------------------------------------------------------------------

    reg_ro!(status, UDMA_BASE, DMASTAT_OFFSET, "Status register");
    reg_wo!(set_config, UDMA_BASE, DMACFG_OFFSET, "Configuration register");
    reg_rw!(control_base, set_control_base, UDMA_BASE, DMACTLBASE_OFFSET, "Channel Control Base Pointer register");
    reg_ro!(alternate_base, UDMA_BASE, DMAALTBASE_OFFSET, "Alternate Channel Control Base Pointer register");
    reg_ro!(wait_status, UDMA_BASE, DMAWAITSTAT_OFFSET, "Channel Wait-on-Request Status register");
    reg_wo!(software_request, UDMA_BASE, DMASWREQ_OFFSET, "Channel Software Request register");
    reg_rw!(channel_assignment, set_channel_assignment, UDMA_BASE, DMACHASGN_OFFSET, "Channel Assignment register");
    reg_rw!(bus_error, set_bus_error, UDMA_BASE, DMAERRCLR_OFFSET, "Bus Error Clear register");

    // -------------------------------------------------------------------------
    // Per-channel SET/CLR pairs (generated by macros)
    // -------------------------------------------------------------------------

    reg_channel_pair!(set_burst_only, clear_burst_only, burst_only,
                      UDMA_BASE, DMAUSEBURSTSET_OFFSET, DMAUSEBURSTCLR_OFFSET, "burst-only requests");
    reg_channel_pair!(mask_requests, unmask_requests, masked_requests,
                      UDMA_BASE, DMAREQMASKSET_OFFSET, DMAREQMASKCLR_OFFSET, "request masking");
    reg_channel_pair!(enable_channels, disable_channels, enabled_channels,
                      UDMA_BASE, DMAENASET_OFFSET, DMAENACLR_OFFSET, "channel enable");
    reg_channel_pair!(select_alternate, select_primary, alternate_selected,
                      UDMA_BASE, DMAALTSET_OFFSET, DMAALTCLR_OFFSET, "alternate control structure selection");
    reg_channel_pair!(set_high_priority, set_default_priority, high_priority,
                      UDMA_BASE, DMAPRIOSET_OFFSET, DMAPRIOCLR_OFFSET, "high priority");

    // -------------------------------------------------------------------------
    // Special operations (cannot be generated by simple macros)
    // -------------------------------------------------------------------------

    /// Enable the controller
    #[inline(always)]
    pub fn enable_master<B: RegisterBus>(bus: &mut B) {
        Self::set_config(bus, DMACFG_MASTEN);
    }

    /// Disable the controller
    #[inline(always)]
    pub fn disable_master<B: RegisterBus>(bus: &mut B) {
        Self::set_config(bus, 0);
    }

    /// Check whether the controller reports itself enabled
    #[inline(always)]
    pub fn is_master_enabled<B: RegisterBus>(bus: &B) -> bool {
        (Self::status(bus) & DMASTAT_MASTEN) != 0
    }

    /// Check the bus error flag
    #[inline(always)]
    pub fn has_bus_error<B: RegisterBus>(bus: &B) -> bool {
        (Self::bus_error(bus) & DMAERRCLR_ERRCLR) != 0
    }

    /// Clear the bus error flag
    #[inline(always)]
    pub fn clear_bus_error<B: RegisterBus>(bus: &mut B) {
        Self::set_bus_error(bus, DMAERRCLR_ERRCLR);
    }

    /// Read the encoding field of `channel` from its DMACHMAPn register
    #[inline(always)]
    pub fn channel_map<B: RegisterBus>(bus: &B, channel: u8) -> u8 {
        ((bus.read(chmap_addr(channel)) >> chmap_shift(channel)) & DMACHMAP_FIELD_MASK) as u8
    }

    /// Replace the encoding field of `channel`, leaving the other fields intact
    #[inline(always)]
    pub fn set_channel_map<B: RegisterBus>(bus: &mut B, channel: u8, encoding: u8) {
        let shift = chmap_shift(channel);
        let field = (encoding as u32 & DMACHMAP_FIELD_MASK) << shift;
        bus.modify(chmap_addr(channel), |v| (v & !(DMACHMAP_FIELD_MASK << shift)) | field);
    }
}

/// uDMA control state machine states, as reported in DMASTAT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ControllerState {
    /// Idle
    Idle = 0,
    /// Reading channel controller data
    ReadingControlData = 1,
    /// Reading source end pointer
    ReadingSourceEnd = 2,
    /// Reading destination end pointer
    ReadingDestinationEnd = 3,
    /// Reading source data
    ReadingSourceData = 4,
    /// Writing destination data
    WritingDestinationData = 5,
    /// Waiting for uDMA request to clear
    WaitingForRequestClear = 6,
    /// Writing channel controller data
    WritingControlData = 7,
    /// Stalled
    Stalled = 8,
    /// Done
    Done = 9,
    /// Undefined (10-15)
    Undefined = 10,
}

impl From<u32> for ControllerState {
    fn from(value: u32) -> Self {
        match (value & DMASTAT_STATE_MASK) >> DMASTAT_STATE_SHIFT {
            0 => ControllerState::Idle,
            1 => ControllerState::ReadingControlData,
            2 => ControllerState::ReadingSourceEnd,
            3 => ControllerState::ReadingDestinationEnd,
            4 => ControllerState::ReadingSourceData,
            5 => ControllerState::WritingDestinationData,
            6 => ControllerState::WaitingForRequestClear,
            7 => ControllerState::WritingControlData,
            8 => ControllerState::Stalled,
            9 => ControllerState::Done,
            _ => ControllerState::Undefined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_match_datasheet() {
        assert_eq!(DMAENASET_OFFSET, 0x028);
        assert_eq!(DMAERRCLR_OFFSET, 0x04C);
        assert_eq!(DMACHASGN_OFFSET, 0x500);
        assert_eq!(DMACHMAP3_OFFSET, DMACHMAP0_OFFSET + 3 * 4);
    }

    #[test]
    fn chmap_covers_all_channels() {
        assert_eq!(chmap_addr(0), UDMA_BASE + DMACHMAP0_OFFSET);
        assert_eq!(chmap_addr(7), UDMA_BASE + DMACHMAP0_OFFSET);
        assert_eq!(chmap_addr(8), UDMA_BASE + DMACHMAP1_OFFSET);
        assert_eq!(chmap_addr(31), UDMA_BASE + DMACHMAP3_OFFSET);
        assert_eq!(chmap_addr(16), UDMA_BASE + DMACHMAP2_OFFSET);
        assert_eq!(chmap_addr(23), UDMA_BASE + DMACHMAP2_OFFSET);
        assert_eq!(chmap_shift(8), 0);
        assert_eq!(chmap_shift(9), 4);
        assert_eq!(chmap_shift(31), 28);
    }

    #[test]
    fn controller_state_decode() {
        assert_eq!(ControllerState::from(0), ControllerState::Idle);
        assert_eq!(ControllerState::from(9 << 4), ControllerState::Done);
        assert_eq!(ControllerState::from(0xF << 4), ControllerState::Undefined);
        // Other fields are ignored
        assert_eq!(
            ControllerState::from(DMASTAT_MASTEN | DMASTAT_DMACHANS_MASK | (8 << 4)),
            ControllerState::Stalled
        );
    }
}
