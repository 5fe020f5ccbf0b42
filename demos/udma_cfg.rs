//! Channel Configuration Example
//!
//! Brings up the uDMA controller with the reference two-channel
//! configuration (channels 8 and 9, encoding 0, default priority, basic mode,
//! single and burst requests, 8-item arbitration), then configures and starts
//! a transfer on each channel.
//!
//! # Running
//!
//! ```text
//! cargo run --example udma_cfg
//! ```
//!
//! On the host the registers live in a [`RamBus`]. On a TM4C123 the same code
//! runs with `Mmio::take()` and `ControlTable::take()` in place of the RAM bus
//! and the boxed table.

use std::collections::HashMap;

use tm4c_udma::unsafe_registers::UdmaRegs;
use tm4c_udma::{
    ArbitrationSize, Channel, ChannelConfig, ControlTable, Encoding, Increment, ItemSize,
    Priority, RegisterBus, RequestType, TransferMode, Udma,
};

// =============================================================================
// Register Bus
// =============================================================================

/// Register file backed by a map; unwritten registers read as zero.
#[derive(Debug, Default)]
struct RamBus {
    regs: HashMap<usize, u32>,
}

impl RegisterBus for RamBus {
    fn read(&self, addr: usize) -> u32 {
        self.regs.get(&addr).copied().unwrap_or(0)
    }

    fn write(&mut self, addr: usize, value: u32) {
        self.regs.insert(addr, value);
    }
}

// =============================================================================
// Channel Configuration
// =============================================================================

/// UART0 RX on encoding 0
const UART0_RX: Channel = Channel::at(8);
/// UART0 TX on encoding 0
const UART0_TX: Channel = Channel::at(9);

/// UART0 data register
const UART0_DR: u32 = 0x4000_C000;

static CHANNELS: [ChannelConfig; 2] = [
    ChannelConfig::new(UART0_RX)
        .with_encoding(Encoding::Enc0)
        .with_priority(Priority::Default)
        .with_mode(TransferMode::Basic)
        .with_request_type(RequestType::SingleAndBurst)
        .with_arbitration_size(ArbitrationSize::Items8),
    ChannelConfig::new(UART0_TX)
        .with_encoding(Encoding::Enc0)
        .with_priority(Priority::Default)
        .with_mode(TransferMode::Basic)
        .with_request_type(RequestType::SingleAndBurst)
        .with_arbitration_size(ArbitrationSize::Items8),
];

const ITEMS: u16 = 64;

/// Receive buffer in SRAM
const RX_BUF: u32 = 0x2000_1000;
/// Transmit buffer in SRAM
const TX_BUF: u32 = 0x2000_1100;

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<(), tm4c_udma::Error> {
    // Transfers are described by the address of their last item
    let rx_end = RX_BUF + u32::from(ITEMS) - 1;
    let tx_end = TX_BUF + u32::from(ITEMS) - 1;

    let table = Box::leak(Box::new(ControlTable::new()));
    let mut udma = Udma::new(RamBus::default(), table);

    // === Init ===
    udma.init(&CHANNELS)?;
    println!(
        "uDMA up: state {:?}, control table at {:#x}",
        udma.state(),
        UdmaRegs::control_base(udma.bus())
    );

    // === Configure ===
    udma.configure_source(UART0_RX, UART0_DR, ItemSize::Byte, Increment::None);
    udma.configure_destination(UART0_RX, rx_end, ItemSize::Byte, Increment::Byte);

    udma.configure_source(UART0_TX, tx_end, ItemSize::Byte, Increment::Byte);
    udma.configure_destination(UART0_TX, UART0_DR, ItemSize::Byte, Increment::None);

    // === Start ===
    for channel in [UART0_RX, UART0_TX] {
        udma.start_transfer(channel, ITEMS)?;

        let entry = udma.table().primary(channel);
        println!(
            "channel {}: src end {:#010x}, dst end {:#010x}, control {:#010x}, {} items pending",
            channel.index(),
            entry.source_end(),
            entry.destination_end(),
            entry.control().bits(),
            udma.pending_items(channel),
        );
    }

    Ok(())
}
