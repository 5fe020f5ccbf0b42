//! Configuration types for the uDMA driver
//!
//! A channel is described once, at compile time, by a [`ChannelConfig`]. The
//! driver receives a slice of them in [`Udma::init`](super::udma::Udma::init)
//! and keeps it for the lifetime of the driver.

use crate::internal::constants::CHANNEL_COUNT;

/// Driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Not yet initialized (or disabled again)
    #[default]
    Uninitialized,
    /// Controller enabled and channels configured
    Initialized,
}

/// uDMA channel number (0-31)
///
/// Only valid channel numbers can be represented, so every table and register
/// access indexed by a `Channel` is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(u8);

impl Channel {
    /// Number of channels on the controller
    pub const COUNT: usize = CHANNEL_COUNT;

    /// Create a channel, returning `None` when `index` is out of range
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < CHANNEL_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Create a channel for a static configuration table
    ///
    /// Intended for `const` contexts, where an out-of-range index is a
    /// compile error.
    ///
    /// # Panics
    /// Panics if `index` is 32 or larger.
    #[must_use]
    pub const fn at(index: u8) -> Self {
        match Self::new(index) {
            Some(channel) => channel,
            None => panic!("uDMA channel index out of range"),
        }
    }

    /// Channel number
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Channel number as stored in registers
    #[inline(always)]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Single-bit mask of this channel in the per-channel SET/CLR registers
    #[inline(always)]
    pub const fn mask(self) -> u32 {
        1 << self.0
    }
}

/// Peripheral request encoding (channel map select)
///
/// Selects which peripheral, or software, drives a channel's requests. The
/// meaning of each encoding is channel specific; see the channel assignment
/// table of the device datasheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Encoding {
    /// Encoding 0
    #[default]
    Enc0 = 0,
    /// Encoding 1
    Enc1 = 1,
    /// Encoding 2
    Enc2 = 2,
    /// Encoding 3
    Enc3 = 3,
    /// Encoding 4
    Enc4 = 4,
}

impl Encoding {
    /// Field value for the DMACHMAPn register
    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Channel priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Priority {
    /// Default priority
    #[default]
    Default,
    /// High priority
    High,
}

/// Transfer mode (control word XFERMODE field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TransferMode {
    /// Stop
    Stop = 0,
    /// Basic
    #[default]
    Basic = 1,
    /// Auto-request
    AutoRequest = 2,
    /// Ping-pong
    PingPong = 3,
    /// Memory scatter-gather
    MemoryScatterGather = 4,
    /// Alternate memory scatter-gather
    AlternateMemoryScatterGather = 5,
    /// Peripheral scatter-gather
    PeripheralScatterGather = 6,
    /// Alternate peripheral scatter-gather
    AlternatePeripheralScatterGather = 7,
}

impl TransferMode {
    /// All transfer modes, in encoding order
    pub const ALL: [TransferMode; 8] = [
        TransferMode::Stop,
        TransferMode::Basic,
        TransferMode::AutoRequest,
        TransferMode::PingPong,
        TransferMode::MemoryScatterGather,
        TransferMode::AlternateMemoryScatterGather,
        TransferMode::PeripheralScatterGather,
        TransferMode::AlternatePeripheralScatterGather,
    ];

    /// Field value for the control word
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Decode from a 3-bit field value
    pub const fn from_bits(bits: u32) -> Self {
        Self::ALL[(bits & 0x7) as usize]
    }

    /// Whether this mode selects the alternate control structure
    ///
    /// Stop, basic and auto-request run from the primary structure; the
    /// ping-pong and scatter-gather modes select the alternate one.
    #[inline(always)]
    pub const fn uses_alternate(self) -> bool {
        !matches!(
            self,
            TransferMode::Stop | TransferMode::Basic | TransferMode::AutoRequest
        )
    }
}

/// Request type accepted by a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestType {
    /// Respond to both single and burst requests
    #[default]
    SingleAndBurst,
    /// Respond to burst requests only
    BurstOnly,
}

/// Arbitration size: items transferred before the controller re-arbitrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ArbitrationSize {
    /// 1 item
    #[default]
    Items1 = 0,
    /// 2 items
    Items2 = 1,
    /// 4 items
    Items4 = 2,
    /// 8 items
    Items8 = 3,
    /// 16 items
    Items16 = 4,
    /// 32 items
    Items32 = 5,
    /// 64 items
    Items64 = 6,
    /// 128 items
    Items128 = 7,
    /// 256 items
    Items256 = 8,
    /// 512 items
    Items512 = 9,
    /// 1024 items
    Items1024 = 10,
}

impl ArbitrationSize {
    /// Field value for the control word
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Number of items per arbitration
    pub const fn items(self) -> u16 {
        1 << (self as u16)
    }
}

/// Size of one transferred item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ItemSize {
    /// 8-bit items
    #[default]
    Byte = 0,
    /// 16-bit items
    HalfWord = 1,
    /// 32-bit items
    Word = 2,
}

impl ItemSize {
    /// Field value for the control word
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Item size in bytes
    pub const fn bytes(self) -> usize {
        1 << (self as usize)
    }
}

/// Address increment applied after each item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Increment {
    /// Increment by one byte
    Byte = 0,
    /// Increment by one half-word
    HalfWord = 1,
    /// Increment by one word
    Word = 2,
    /// Address stays fixed (peripheral FIFO)
    #[default]
    None = 3,
}

impl Increment {
    /// Field value for the control word
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

/// Static configuration of one channel
///
/// # Example
///
/// ```ignore
/// static CHANNELS: [ChannelConfig; 2] = [
///     ChannelConfig::new(Channel::at(8)).with_arbitration_size(ArbitrationSize::Items8),
///     ChannelConfig::new(Channel::at(9)).with_arbitration_size(ArbitrationSize::Items8),
/// ];
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Channel being configured
    pub channel: Channel,
    /// Peripheral request encoding
    pub encoding: Encoding,
    /// Priority
    pub priority: Priority,
    /// Transfer mode
    pub mode: TransferMode,
    /// Request type
    pub request_type: RequestType,
    /// Arbitration size
    pub arbitration_size: ArbitrationSize,
}

impl ChannelConfig {
    /// Configuration with encoding 0, default priority, basic mode, single
    /// and burst requests, arbitration after every item
    #[must_use]
    pub const fn new(channel: Channel) -> Self {
        Self {
            channel,
            encoding: Encoding::Enc0,
            priority: Priority::Default,
            mode: TransferMode::Basic,
            request_type: RequestType::SingleAndBurst,
            arbitration_size: ArbitrationSize::Items1,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the peripheral request encoding
    #[must_use]
    pub const fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the transfer mode
    #[must_use]
    pub const fn with_mode(mut self, mode: TransferMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the request type
    #[must_use]
    pub const fn with_request_type(mut self, request_type: RequestType) -> Self {
        self.request_type = request_type;
        self
    }

    /// Set the arbitration size
    #[must_use]
    pub const fn with_arbitration_size(mut self, arbitration_size: ArbitrationSize) -> Self {
        self.arbitration_size = arbitration_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_range() {
        assert!(Channel::new(0).is_some());
        assert!(Channel::new(31).is_some());
        assert!(Channel::new(32).is_none());
        assert!(Channel::new(255).is_none());
    }

    #[test]
    fn channel_mask() {
        assert_eq!(Channel::at(0).mask(), 0x1);
        assert_eq!(Channel::at(9).mask(), 1 << 9);
        assert_eq!(Channel::at(31).mask(), 0x8000_0000);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn channel_at_panics_out_of_range() {
        let _ = Channel::at(32);
    }

    #[test]
    fn mode_alternate_split() {
        for mode in TransferMode::ALL {
            let expected = mode.bits() > 2;
            assert_eq!(mode.uses_alternate(), expected, "{mode:?}");
        }
    }

    #[test]
    fn mode_bits_round_trip() {
        for mode in TransferMode::ALL {
            assert_eq!(TransferMode::from_bits(mode.bits()), mode);
        }
    }

    #[test]
    fn arbitration_items() {
        assert_eq!(ArbitrationSize::Items1.items(), 1);
        assert_eq!(ArbitrationSize::Items8.items(), 8);
        assert_eq!(ArbitrationSize::Items1024.items(), 1024);
        assert_eq!(ArbitrationSize::Items8.bits(), 3);
    }

    #[test]
    fn item_size_bytes() {
        assert_eq!(ItemSize::Byte.bytes(), 1);
        assert_eq!(ItemSize::HalfWord.bytes(), 2);
        assert_eq!(ItemSize::Word.bytes(), 4);
    }

    #[test]
    fn builder_sets_fields() {
        let config = ChannelConfig::new(Channel::at(3))
            .with_encoding(Encoding::Enc2)
            .with_priority(Priority::High)
            .with_mode(TransferMode::PingPong)
            .with_request_type(RequestType::BurstOnly)
            .with_arbitration_size(ArbitrationSize::Items16);

        assert_eq!(config.channel, Channel::at(3));
        assert_eq!(config.encoding, Encoding::Enc2);
        assert_eq!(config.priority, Priority::High);
        assert_eq!(config.mode, TransferMode::PingPong);
        assert_eq!(config.request_type, RequestType::BurstOnly);
        assert_eq!(config.arbitration_size, ArbitrationSize::Items16);
    }

    #[test]
    fn const_table_builds() {
        const TABLE: [ChannelConfig; 2] = [
            ChannelConfig::new(Channel::at(8)).with_arbitration_size(ArbitrationSize::Items8),
            ChannelConfig::new(Channel::at(9)).with_arbitration_size(ArbitrationSize::Items8),
        ];
        assert_eq!(TABLE[1].channel.index(), 9);
    }
}
