//! Register bus abstraction
//!
//! All register traffic of the driver goes through a [`RegisterBus`]. On the
//! target this is [`Mmio`], which performs volatile accesses at the absolute
//! peripheral addresses. Host tests substitute a mock that models the
//! controller's SET/CLR register semantics.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::internal::register::{read_reg, write_reg};

/// Access to 32-bit memory-mapped registers by absolute address
pub trait RegisterBus {
    /// Read a register
    fn read(&self, addr: usize) -> u32;

    /// Write a register
    fn write(&mut self, addr: usize, value: u32);

    /// Read-modify-write a register
    ///
    /// Not atomic with respect to other writers of the same register.
    #[inline]
    fn modify<F>(&mut self, addr: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(addr);
        self.write(addr, f(value));
    }
}

impl<B: RegisterBus> RegisterBus for &mut B {
    #[inline]
    fn read(&self, addr: usize) -> u32 {
        (**self).read(addr)
    }

    #[inline]
    fn write(&mut self, addr: usize, value: u32) {
        (**self).write(addr, value);
    }
}

static MMIO_TAKEN: AtomicBool = AtomicBool::new(false);

/// Volatile memory-mapped register bus
///
/// Owning an `Mmio` means owning the uDMA controller and its System Control
/// gating bit. [`Mmio::take`] hands it out once per program run.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Take the hardware bus. Returns `None` on every call after the first.
    pub fn take() -> Option<Self> {
        if MMIO_TAKEN.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self { _private: () })
        }
    }

    /// Create a bus without checking whether one was already handed out
    ///
    /// # Safety
    /// The caller must ensure no other `Mmio` is used concurrently; the
    /// driver's read-modify-write sequences are not atomic.
    pub unsafe fn steal() -> Self {
        MMIO_TAKEN.store(true, Ordering::Release);
        Self { _private: () }
    }
}

impl RegisterBus for Mmio {
    #[inline(always)]
    fn read(&self, addr: usize) -> u32 {
        // SAFETY: Mmio is only used with the fixed uDMA/SYSCTL register
        // addresses, which are valid and word aligned on the target.
        unsafe { read_reg(addr) }
    }

    #[inline(always)]
    fn write(&mut self, addr: usize, value: u32) {
        // SAFETY: see `read`.
        unsafe { write_reg(addr, value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockBus;

    #[test]
    fn modify_reads_then_writes() {
        let mut bus = MockBus::new();
        bus.set_register(0x2000_0000, 0xF0);
        bus.modify(0x2000_0000, |v| v | 0x0F);
        assert_eq!(bus.register(0x2000_0000), 0xFF);
        assert_eq!(bus.writes(), &[(0x2000_0000, 0xFF)]);
    }

    #[test]
    fn mutable_reference_forwards() {
        fn poke<B: RegisterBus>(mut bus: B) -> u32 {
            bus.write(0x2000_0004, 7);
            bus.read(0x2000_0004)
        }

        let mut bus = MockBus::new();
        assert_eq!(poke(&mut bus), 7);
        assert_eq!(bus.writes_to(0x2000_0004), 1);
    }

    #[test]
    fn take_hands_out_once() {
        let _first = Mmio::take();
        assert!(Mmio::take().is_none());
    }
}
