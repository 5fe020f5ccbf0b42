//! Core uDMA driver implementation.
//!
//! This module contains the main [`Udma`] structure:
//!
//! - Initialization from a static channel configuration table
//! - Per-transfer source/destination programming
//! - Transfer start/stop and software requests
//! - Controller status and bus error handling

use super::config::{
    Channel, ChannelConfig, Increment, ItemSize, Priority, RequestType, State, TransferMode,
};
use super::error::{ConfigError, Result, TransferError};
use super::table::{ControlTable, ControlWord};
use crate::hal::bus::RegisterBus;
use crate::hal::clock::ClockController;
use crate::internal::constants::{CHANNEL_COUNT, MAX_TRANSFER_ITEMS};
use crate::internal::register::udma::{
    ControllerState, DMASTAT_DMACHANS_MASK, DMASTAT_DMACHANS_SHIFT, DMASTAT_MASTEN, UdmaRegs,
};

#[cfg(feature = "log")]
use log::{debug, warn};

// =============================================================================
// Controller Status
// =============================================================================

/// Decoded DMASTAT register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerStatus {
    /// Controller master enable
    pub master_enabled: bool,
    /// Control state machine state
    pub state: ControllerState,
    /// Number of channels the controller implements
    pub channels: u8,
}

impl From<u32> for ControllerStatus {
    fn from(value: u32) -> Self {
        Self {
            master_enabled: (value & DMASTAT_MASTEN) != 0,
            state: ControllerState::from(value),
            channels: (((value & DMASTAT_DMACHANS_MASK) >> DMASTAT_DMACHANS_SHIFT) + 1) as u8,
        }
    }
}

// =============================================================================
// uDMA Driver
// =============================================================================

/// TM4C123 uDMA driver
///
/// Owns the register bus, holds the only mutable borrow of the channel control
/// table and borrows the static channel configuration for its whole lifetime.
/// Every operation that touches the controller takes `&mut self`, so one
/// `Udma` is the single writer of both the registers and the table.
///
/// # Example
/// ```ignore
/// static CHANNELS: [ChannelConfig; 1] = [
///     ChannelConfig::new(Channel::at(30)).with_mode(TransferMode::AutoRequest),
/// ];
///
/// let table = ControlTable::take().unwrap();
/// let mut udma = Udma::new(Mmio::take().unwrap(), table);
/// udma.init(&CHANNELS).unwrap();
///
/// let ch = Channel::at(30);
/// udma.configure_source(ch, src_end, ItemSize::Word, Increment::Word);
/// udma.configure_destination(ch, dst_end, ItemSize::Word, Increment::Word);
/// udma.start_transfer(ch, 64).unwrap();
/// udma.request_software_transfer(ch);
/// ```
///
/// The table stays borrowed until the driver is dropped or released:
///
/// ```compile_fail
/// use tm4c_udma::{Channel, ControlTable, ControlWord, Mmio, Udma};
///
/// let mut table = ControlTable::new();
/// let udma = Udma::new(unsafe { Mmio::steal() }, &mut table);
/// table.primary_mut(Channel::at(8)).set_control(ControlWord::default());
/// drop(udma);
/// ```
pub struct Udma<'a, B: RegisterBus> {
    /// Register bus
    bus: B,
    /// Channel control table
    table: &'a mut ControlTable,
    /// Clock gating
    clock: ClockController,
    /// Configuration table given to `init`
    configs: &'a [ChannelConfig],
    /// Index into `configs` by channel number
    lookup: [Option<usize>; CHANNEL_COUNT],
    /// Current state
    state: State,
}

impl<'a, B: RegisterBus> Udma<'a, B> {
    /// Create a new driver instance in the `Uninitialized` state
    pub fn new(bus: B, table: &'a mut ControlTable) -> Self {
        Self::with_clock(bus, table, ClockController::new())
    }

    /// Create a new driver instance with a custom clock controller
    pub fn with_clock(bus: B, table: &'a mut ControlTable, clock: ClockController) -> Self {
        Self {
            bus,
            table,
            clock,
            configs: &[],
            lookup: [None; CHANNEL_COUNT],
            state: State::Uninitialized,
        }
    }

    // =========================================================================
    // State Accessors
    // =========================================================================

    /// Get the current state
    #[inline(always)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Get the register bus
    #[inline(always)]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Get a read-only view of the channel control table
    #[inline(always)]
    pub fn table(&self) -> &ControlTable {
        self.table
    }

    #[cfg(test)]
    pub(crate) fn table_mut(&mut self) -> &mut ControlTable {
        self.table
    }

    /// Get the configuration table given to `init`
    #[inline(always)]
    pub fn configs(&self) -> &'a [ChannelConfig] {
        self.configs
    }

    /// Configuration of `channel`, if it was part of the `init` table
    ///
    /// When a channel appears more than once, the first entry wins.
    #[inline]
    pub fn config_for(&self, channel: Channel) -> Option<&'a ChannelConfig> {
        let configs = self.configs;
        self.lookup[channel.index()].map(|i| &configs[i])
    }

    /// Release the bus, consuming the driver
    pub fn release(self) -> B {
        self.bus
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize the controller and apply the static channel configuration
    ///
    /// This performs the full initialization sequence:
    /// 1. Ungate the uDMA clock and wait for it to settle
    /// 2. Set the controller master enable
    /// 3. Program the control table base address
    /// 4. For each entry, in order: channel map, priority, transfer mode,
    ///    request type, arbitration size, then unmask the channel's requests
    ///
    /// Channels are not enabled here; [`start_transfer`](Self::start_transfer)
    /// does that.
    ///
    /// # Errors
    /// - `AlreadyInitialized` - `init` was already called
    pub fn init(&mut self, configs: &'a [ChannelConfig]) -> Result<()> {
        if self.state != State::Uninitialized {
            return Err(ConfigError::AlreadyInitialized.into());
        }

        // === STEP 1: Clock ===
        self.clock.enable(&mut self.bus);

        // === STEP 2: Master enable ===
        UdmaRegs::enable_master(&mut self.bus);

        // === STEP 3: Control table ===
        let base = self.table.base_addr();
        UdmaRegs::set_control_base(&mut self.bus, base as u32);

        #[cfg(feature = "defmt")]
        defmt::info!("uDMA enabled, control table at {=usize:#x}", base);

        // === STEP 4: Channels ===
        self.lookup = [None; CHANNEL_COUNT];
        for (i, config) in configs.iter().enumerate() {
            self.apply_config(config);

            let slot = &mut self.lookup[config.channel.index()];
            if slot.is_none() {
                *slot = Some(i);
            }
        }

        self.configs = configs;
        self.state = State::Initialized;
        Ok(())
    }

    /// Apply one channel's static configuration
    fn apply_config(&mut self, config: &ChannelConfig) {
        let channel = config.channel;

        UdmaRegs::set_channel_map(&mut self.bus, channel.number(), config.encoding.bits());
        self.set_priority(channel, config.priority);
        self.set_mode(channel, config.mode);
        self.set_request_type(channel, config.request_type);
        self.table
            .primary_mut(channel)
            .update_control(|w| w.with_arbitration_size(config.arbitration_size));
        UdmaRegs::unmask_requests(&mut self.bus, channel.mask());

        #[cfg(feature = "defmt")]
        defmt::debug!("uDMA channel {} configured: {}", channel.number(), config);

        #[cfg(feature = "log")]
        debug!(
            "uDMA channel {} configured: mode={:?} arb={:?}",
            channel.number(),
            config.mode,
            config.arbitration_size
        );
    }

    /// Disable the controller and return to the `Uninitialized` state
    ///
    /// Every channel from the configuration table is disabled and masked
    /// first. The clock stays ungated.
    pub fn disable(&mut self) {
        let mask = self
            .configs
            .iter()
            .fold(0u32, |mask, config| mask | config.channel.mask());
        UdmaRegs::disable_channels(&mut self.bus, mask);
        UdmaRegs::mask_requests(&mut self.bus, mask);
        UdmaRegs::disable_master(&mut self.bus);

        self.configs = &[];
        self.lookup = [None; CHANNEL_COUNT];
        self.state = State::Uninitialized;
    }

    // =========================================================================
    // Channel Attributes
    // =========================================================================

    /// Set a channel's priority
    pub fn set_priority(&mut self, channel: Channel, priority: Priority) {
        match priority {
            Priority::Default => UdmaRegs::set_default_priority(&mut self.bus, channel.mask()),
            Priority::High => UdmaRegs::set_high_priority(&mut self.bus, channel.mask()),
        }
    }

    /// Set the transfer mode in the primary control word and select the
    /// control structure that mode runs from
    fn set_mode(&mut self, channel: Channel, mode: TransferMode) {
        self.table
            .primary_mut(channel)
            .update_control(|w| w.with_mode(mode));

        if mode.uses_alternate() {
            UdmaRegs::select_alternate(&mut self.bus, channel.mask());
        } else {
            UdmaRegs::select_primary(&mut self.bus, channel.mask());
        }
    }

    fn set_request_type(&mut self, channel: Channel, request_type: RequestType) {
        match request_type {
            RequestType::BurstOnly => UdmaRegs::set_burst_only(&mut self.bus, channel.mask()),
            RequestType::SingleAndBurst => {
                UdmaRegs::clear_burst_only(&mut self.bus, channel.mask());
            }
        }
    }

    // =========================================================================
    // Transfer Programming
    // =========================================================================

    /// Program the source end pointer and source item size/increment
    ///
    /// `end_address` is the address of the last source item. All other
    /// control word fields are preserved.
    pub fn configure_source(
        &mut self,
        channel: Channel,
        end_address: u32,
        item_size: ItemSize,
        increment: Increment,
    ) {
        let entry = self.table.primary_mut(channel);
        entry.set_source_end(end_address);
        entry.update_control(|w| w.with_source(item_size, increment));
    }

    /// Program the destination end pointer and destination item
    /// size/increment
    ///
    /// `end_address` is the address of the last destination item. All other
    /// control word fields are preserved.
    pub fn configure_destination(
        &mut self,
        channel: Channel,
        end_address: u32,
        item_size: ItemSize,
        increment: Increment,
    ) {
        let entry = self.table.primary_mut(channel);
        entry.set_destination_end(end_address);
        entry.update_control(|w| w.with_destination(item_size, increment));
    }

    /// Current primary control word of `channel`
    #[inline]
    pub fn control_word(&self, channel: Channel) -> ControlWord {
        self.table.primary(channel).control()
    }

    /// Items the controller still has to move on `channel`
    ///
    /// The controller counts the size field down as it transfers and rewrites
    /// the mode to `Stop` when done, so a stopped channel reports zero.
    pub fn pending_items(&self, channel: Channel) -> u16 {
        let word = self.control_word(channel);
        if word.mode() == TransferMode::Stop {
            0
        } else {
            word.transfer_size_field() as u16 + 1
        }
    }

    // =========================================================================
    // Transfer Control
    // =========================================================================

    /// Arm a transfer of `items` items on `channel`
    ///
    /// For a channel from the configuration table the transfer mode is
    /// re-applied (which also reselects the primary or alternate structure)
    /// and the size field is set to `items - 1`. A channel outside the table
    /// keeps its control word as is. In both cases the channel is enabled and
    /// runs on its next request.
    ///
    /// # Errors
    /// - `NotInitialized` - `init` has not been called
    /// - `InvalidLength` - `items` is zero or larger than 1024
    pub fn start_transfer(&mut self, channel: Channel, items: u16) -> Result<()> {
        if self.state != State::Initialized {
            return Err(ConfigError::NotInitialized.into());
        }
        if items == 0 || items > MAX_TRANSFER_ITEMS {
            return Err(TransferError::InvalidLength.into());
        }

        if let Some(config) = self.config_for(channel) {
            self.set_mode(channel, config.mode);
            self.table
                .primary_mut(channel)
                .update_control(|w| w.with_transfer_size_field(u32::from(items - 1)));
        } else {
            #[cfg(feature = "log")]
            warn!(
                "uDMA channel {} not configured, starting with existing control word",
                channel.number()
            );
        }

        UdmaRegs::enable_channels(&mut self.bus, channel.mask());
        Ok(())
    }

    /// Issue a software request on `channel`
    ///
    /// Starts an enabled software-mapped or auto-request channel.
    pub fn request_software_transfer(&mut self, channel: Channel) {
        UdmaRegs::software_request(&mut self.bus, channel.mask());
    }

    /// Disable `channel`, stopping any transfer in progress
    pub fn stop_transfer(&mut self, channel: Channel) {
        UdmaRegs::disable_channels(&mut self.bus, channel.mask());
    }

    /// Check whether `channel` is enabled
    ///
    /// The controller clears the enable bit when a basic or auto-request
    /// transfer completes.
    pub fn is_enabled(&self, channel: Channel) -> bool {
        (UdmaRegs::enabled_channels(&self.bus) & channel.mask()) != 0
    }

    /// Check whether `channel` is waiting on a request (DMAWAITSTAT)
    pub fn is_waiting_on_request(&self, channel: Channel) -> bool {
        (UdmaRegs::wait_status(&self.bus) & channel.mask()) != 0
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Read and decode the controller status
    pub fn controller_status(&self) -> ControllerStatus {
        ControllerStatus::from(UdmaRegs::status(&self.bus))
    }

    /// Check the bus error flag
    pub fn bus_error(&self) -> bool {
        UdmaRegs::has_bus_error(&self.bus)
    }

    /// Clear the bus error flag
    pub fn clear_bus_error(&mut self) {
        UdmaRegs::clear_bus_error(&mut self.bus);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
