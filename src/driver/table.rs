//! Channel control table
//!
//! The controller reads every transfer's parameters from a table in system
//! memory: one 16-byte structure per channel in the primary half, and one per
//! channel in the alternate half. The table base must be aligned to the table
//! size (1024 bytes for 32 channels).
//!
//! [`ControlTable`] carries that alignment in its type, so any instance, static
//! or otherwise, is placed correctly by the compiler. [`locate_table`] remains
//! for callers that must carve a table out of an arbitrary byte buffer.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

use super::config::{ArbitrationSize, Channel, Increment, ItemSize, TransferMode};
use super::error::{ConfigError, ConfigResult};
use crate::internal::constants::{
    CHANNEL_COUNT, CONTROL_ENTRY_SIZE, CONTROL_TABLE_ALIGNMENT, CONTROL_TABLE_SIZE,
};

// =============================================================================
// Control Word (DMACHCTL) Bit Fields
// =============================================================================

/// Control word bit field constants
pub mod chctl {
    /// Transfer mode shift
    pub const XFERMODE_SHIFT: u32 = 0;
    /// Transfer mode mask (3 bits)
    pub const XFERMODE_MASK: u32 = 0x7 << XFERMODE_SHIFT;
    /// Next useburst
    pub const NXTUSEBURST: u32 = 1 << 3;
    /// Transfer size (minus one) shift
    pub const XFERSIZE_SHIFT: u32 = 4;
    /// Transfer size (minus one) mask (10 bits)
    pub const XFERSIZE_MASK: u32 = 0x3FF << XFERSIZE_SHIFT;
    /// Arbitration size shift
    pub const ARBSIZE_SHIFT: u32 = 14;
    /// Arbitration size mask (4 bits)
    pub const ARBSIZE_MASK: u32 = 0xF << ARBSIZE_SHIFT;
    /// Source protection shift
    pub const SRCPROT_SHIFT: u32 = 18;
    /// Source protection mask (3 bits)
    pub const SRCPROT_MASK: u32 = 0x7 << SRCPROT_SHIFT;
    /// Destination protection shift
    pub const DSTPROT_SHIFT: u32 = 21;
    /// Destination protection mask (3 bits)
    pub const DSTPROT_MASK: u32 = 0x7 << DSTPROT_SHIFT;
    /// Source item size shift
    pub const SRCSIZE_SHIFT: u32 = 24;
    /// Source item size mask (2 bits)
    pub const SRCSIZE_MASK: u32 = 0x3 << SRCSIZE_SHIFT;
    /// Source address increment shift
    pub const SRCINC_SHIFT: u32 = 26;
    /// Source address increment mask (2 bits)
    pub const SRCINC_MASK: u32 = 0x3 << SRCINC_SHIFT;
    /// Destination item size shift
    pub const DSTSIZE_SHIFT: u32 = 28;
    /// Destination item size mask (2 bits)
    pub const DSTSIZE_MASK: u32 = 0x3 << DSTSIZE_SHIFT;
    /// Destination address increment shift
    pub const DSTINC_SHIFT: u32 = 30;
    /// Destination address increment mask (2 bits)
    pub const DSTINC_MASK: u32 = 0x3 << DSTINC_SHIFT;
}

/// Packed channel control word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct ControlWord(u32);

impl ControlWord {
    /// Wrap a raw control word
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw value
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline(always)]
    const fn with_field(self, mask: u32, shift: u32, value: u32) -> Self {
        Self((self.0 & !mask) | ((value << shift) & mask))
    }

    #[inline(always)]
    const fn field(self, mask: u32, shift: u32) -> u32 {
        (self.0 & mask) >> shift
    }

    /// Transfer mode
    pub const fn mode(self) -> TransferMode {
        TransferMode::from_bits(self.field(chctl::XFERMODE_MASK, chctl::XFERMODE_SHIFT))
    }

    /// Replace the transfer mode
    #[must_use]
    pub const fn with_mode(self, mode: TransferMode) -> Self {
        self.with_field(chctl::XFERMODE_MASK, chctl::XFERMODE_SHIFT, mode.bits())
    }

    /// Next-useburst flag (peripheral scatter-gather)
    pub const fn next_use_burst(self) -> bool {
        (self.0 & chctl::NXTUSEBURST) != 0
    }

    /// Replace the next-useburst flag
    #[must_use]
    pub const fn with_next_use_burst(self, enabled: bool) -> Self {
        if enabled {
            Self(self.0 | chctl::NXTUSEBURST)
        } else {
            Self(self.0 & !chctl::NXTUSEBURST)
        }
    }

    /// Raw transfer size field (items minus one)
    pub const fn transfer_size_field(self) -> u32 {
        self.field(chctl::XFERSIZE_MASK, chctl::XFERSIZE_SHIFT)
    }

    /// Replace the raw transfer size field (items minus one)
    #[must_use]
    pub const fn with_transfer_size_field(self, size_minus_one: u32) -> Self {
        self.with_field(chctl::XFERSIZE_MASK, chctl::XFERSIZE_SHIFT, size_minus_one)
    }

    /// Raw arbitration size field
    pub const fn arbitration_field(self) -> u32 {
        self.field(chctl::ARBSIZE_MASK, chctl::ARBSIZE_SHIFT)
    }

    /// Replace the arbitration size
    #[must_use]
    pub const fn with_arbitration_size(self, size: ArbitrationSize) -> Self {
        self.with_field(chctl::ARBSIZE_MASK, chctl::ARBSIZE_SHIFT, size.bits())
    }

    /// Source protection bits
    pub const fn source_protection(self) -> u8 {
        self.field(chctl::SRCPROT_MASK, chctl::SRCPROT_SHIFT) as u8
    }

    /// Replace the source protection bits
    #[must_use]
    pub const fn with_source_protection(self, prot: u8) -> Self {
        self.with_field(chctl::SRCPROT_MASK, chctl::SRCPROT_SHIFT, prot as u32)
    }

    /// Destination protection bits
    pub const fn destination_protection(self) -> u8 {
        self.field(chctl::DSTPROT_MASK, chctl::DSTPROT_SHIFT) as u8
    }

    /// Replace the destination protection bits
    #[must_use]
    pub const fn with_destination_protection(self, prot: u8) -> Self {
        self.with_field(chctl::DSTPROT_MASK, chctl::DSTPROT_SHIFT, prot as u32)
    }

    /// Raw source item size field
    pub const fn source_size_field(self) -> u32 {
        self.field(chctl::SRCSIZE_MASK, chctl::SRCSIZE_SHIFT)
    }

    /// Raw source increment field
    pub const fn source_increment_field(self) -> u32 {
        self.field(chctl::SRCINC_MASK, chctl::SRCINC_SHIFT)
    }

    /// Replace source item size and increment
    #[must_use]
    pub const fn with_source(self, size: ItemSize, increment: Increment) -> Self {
        self.with_field(chctl::SRCSIZE_MASK, chctl::SRCSIZE_SHIFT, size.bits())
            .with_field(chctl::SRCINC_MASK, chctl::SRCINC_SHIFT, increment.bits())
    }

    /// Raw destination item size field
    pub const fn destination_size_field(self) -> u32 {
        self.field(chctl::DSTSIZE_MASK, chctl::DSTSIZE_SHIFT)
    }

    /// Raw destination increment field
    pub const fn destination_increment_field(self) -> u32 {
        self.field(chctl::DSTINC_MASK, chctl::DSTINC_SHIFT)
    }

    /// Replace destination item size and increment
    #[must_use]
    pub const fn with_destination(self, size: ItemSize, increment: Increment) -> Self {
        self.with_field(chctl::DSTSIZE_MASK, chctl::DSTSIZE_SHIFT, size.bits())
            .with_field(chctl::DSTINC_MASK, chctl::DSTINC_SHIFT, increment.bits())
    }
}

// =============================================================================
// Volatile Storage
// =============================================================================

/// Volatile cell wrapper for table fields
///
/// The controller reads and rewrites the table behind the compiler's back, so
/// every access must be volatile.
#[repr(transparent)]
struct VolatileCell<T: Copy> {
    value: UnsafeCell<T>,
}

impl<T: Copy> VolatileCell<T> {
    const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
        }
    }

    #[inline(always)]
    fn get(&self) -> T {
        // SAFETY: the pointer comes from an UnsafeCell we own.
        unsafe { core::ptr::read_volatile(self.value.get()) }
    }

    #[inline(always)]
    fn set(&self, value: T) {
        // SAFETY: the pointer comes from an UnsafeCell we own.
        unsafe { core::ptr::write_volatile(self.value.get(), value) }
    }
}

// =============================================================================
// Channel Control Entry
// =============================================================================

/// One channel control structure
///
/// End pointers hold the address of the *last* item of the transfer; the
/// controller computes each item address backwards from it.
#[repr(C)]
pub struct ChannelControlEntry {
    /// DMASRCENDP: source end pointer
    source_end: VolatileCell<u32>,
    /// DMADSTENDP: destination end pointer
    destination_end: VolatileCell<u32>,
    /// DMACHCTL: control word
    control: VolatileCell<u32>,
    /// Unused; keeps the 16-byte stride
    _reserved: u32,
}

impl ChannelControlEntry {
    /// Size of the structure in bytes
    pub const SIZE: usize = CONTROL_ENTRY_SIZE;

    /// Zeroed entry
    #[must_use]
    pub const fn new() -> Self {
        Self {
            source_end: VolatileCell::new(0),
            destination_end: VolatileCell::new(0),
            control: VolatileCell::new(0),
            _reserved: 0,
        }
    }

    /// Source end pointer
    #[inline(always)]
    pub fn source_end(&self) -> u32 {
        self.source_end.get()
    }

    /// Set the source end pointer
    #[inline(always)]
    pub fn set_source_end(&mut self, addr: u32) {
        self.source_end.set(addr);
    }

    /// Destination end pointer
    #[inline(always)]
    pub fn destination_end(&self) -> u32 {
        self.destination_end.get()
    }

    /// Set the destination end pointer
    #[inline(always)]
    pub fn set_destination_end(&mut self, addr: u32) {
        self.destination_end.set(addr);
    }

    /// Control word
    #[inline(always)]
    pub fn control(&self) -> ControlWord {
        ControlWord(self.control.get())
    }

    /// Overwrite the control word
    #[inline(always)]
    pub fn set_control(&mut self, word: ControlWord) {
        self.control.set(word.0);
    }

    /// Read-modify-write the control word
    #[inline(always)]
    pub fn update_control<F>(&mut self, f: F)
    where
        F: FnOnce(ControlWord) -> ControlWord,
    {
        self.set_control(f(self.control()));
    }
}

impl Default for ChannelControlEntry {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Control Table
// =============================================================================

/// Full channel control table, primary half followed by alternate half
///
/// Writes need `&mut ControlTable`, and the driver holds that borrow for its
/// whole lifetime, so nothing else can rewrite an entry under it. The table
/// is not `Sync`; a plain `static` of it does not compile:
///
/// ```compile_fail
/// use tm4c_udma::ControlTable;
/// static TABLE: ControlTable = ControlTable::new();
/// ```
///
/// and a shared reference only reads:
///
/// ```compile_fail
/// use tm4c_udma::{Channel, ControlTable, ControlWord};
/// let table = ControlTable::new();
/// let shared = &table;
/// shared.primary(Channel::at(8)).set_control(ControlWord::from_bits(0));
/// ```
///
/// Use [`ControlTable::take`] for a `'static` table on the target.
#[repr(C, align(1024))]
pub struct ControlTable {
    primary: [ChannelControlEntry; CHANNEL_COUNT],
    alternate: [ChannelControlEntry; CHANNEL_COUNT],
}

impl ControlTable {
    /// Size of the table in bytes
    pub const SIZE: usize = 2 * CHANNEL_COUNT * CONTROL_ENTRY_SIZE;

    /// Required base alignment in bytes
    pub const ALIGNMENT: usize = CONTROL_TABLE_ALIGNMENT;

    /// Zeroed table
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primary: [const { ChannelControlEntry::new() }; CHANNEL_COUNT],
            alternate: [const { ChannelControlEntry::new() }; CHANNEL_COUNT],
        }
    }

    /// Take the crate's static table. Returns `None` on every call after the
    /// first.
    pub fn take() -> Option<&'static mut ControlTable> {
        if STATIC_TABLE_TAKEN.swap(true, Ordering::AcqRel) {
            None
        } else {
            // SAFETY: the flag hands out the table once, so this is the only
            // reference to it.
            Some(unsafe { &mut *core::ptr::addr_of_mut!(STATIC_TABLE) })
        }
    }

    /// Primary control structure of `channel`
    #[inline(always)]
    pub fn primary(&self, channel: Channel) -> &ChannelControlEntry {
        &self.primary[channel.index()]
    }

    /// Alternate control structure of `channel`
    #[inline(always)]
    pub fn alternate(&self, channel: Channel) -> &ChannelControlEntry {
        &self.alternate[channel.index()]
    }

    /// Mutable primary control structure of `channel`
    #[inline(always)]
    pub fn primary_mut(&mut self, channel: Channel) -> &mut ChannelControlEntry {
        &mut self.primary[channel.index()]
    }

    /// Mutable alternate control structure of `channel`
    #[inline(always)]
    pub fn alternate_mut(&mut self, channel: Channel) -> &mut ChannelControlEntry {
        &mut self.alternate[channel.index()]
    }

    /// Base address of the table, as programmed into DMACTLBASE
    #[inline(always)]
    pub fn base_addr(&self) -> usize {
        self as *const Self as usize
    }

    /// Zero every entry
    pub fn clear(&mut self) {
        for entry in self.primary.iter_mut().chain(self.alternate.iter_mut()) {
            entry.set_source_end(0);
            entry.set_destination_end(0);
            entry.set_control(ControlWord::default());
        }
    }
}

impl Default for ControlTable {
    fn default() -> Self {
        Self::new()
    }
}

static mut STATIC_TABLE: ControlTable = ControlTable::new();
static STATIC_TABLE_TAKEN: AtomicBool = AtomicBool::new(false);

const _: () = assert!(core::mem::align_of::<ControlTable>() == CONTROL_TABLE_ALIGNMENT);
const _: () = assert!(core::mem::size_of::<ControlTable>() == CONTROL_TABLE_SIZE);

// =============================================================================
// Fallback Placement
// =============================================================================

/// Find an address inside `buffer` where a table of `table_size` bytes can
/// start with the given alignment
///
/// Scans forward from the start of the buffer and returns the first aligned
/// address whose table still fits. A buffer of at least
/// `table_size + alignment - 1` bytes always succeeds.
///
/// # Errors
/// - `TableNotFound` - the buffer is too small, or `alignment` is zero
pub fn locate_table(buffer: &[u8], alignment: usize, table_size: usize) -> ConfigResult<usize> {
    if alignment == 0 {
        return Err(ConfigError::TableNotFound);
    }

    let start = buffer.as_ptr() as usize;
    (0..buffer.len())
        .take_while(|offset| offset + table_size <= buffer.len())
        .map(|offset| start + offset)
        .find(|addr| addr.is_multiple_of(alignment))
        .ok_or(ConfigError::TableNotFound)
}

// =============================================================================
// Unit Tests
// =============================================================================
