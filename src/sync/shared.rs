//! ISR-safe uDMA wrapper using critical sections.
//!
//! Provides [`SharedUdma`], a static slot that holds one [`Udma`] driver and
//! hands out exclusive access from thread mode and interrupt handlers.

use super::primitives::CriticalSectionCell;
use crate::driver::udma::Udma;
use crate::hal::bus::{Mmio, RegisterBus};

/// ISR-safe uDMA wrapper using critical sections.
///
/// The slot starts empty so it can live in a `static`; the driver is built at
/// runtime and moved in with [`install`](Self::install). All access goes
/// through `critical_section::with()`, disabling interrupts for the duration
/// of the closure.
///
/// # Example
///
/// ```ignore
/// static UDMA: SharedUdma<'static, Mmio> = SharedUdma::new();
///
/// let table = ControlTable::take().unwrap();
/// let mut udma = Udma::new(Mmio::take().unwrap(), table);
/// udma.init(&CHANNELS).unwrap();
/// UDMA.install(udma);
///
/// UDMA.with(|udma| udma.start_transfer(Channel::at(8), 64));
/// ```
pub struct SharedUdma<'a, B: RegisterBus> {
    inner: CriticalSectionCell<Option<Udma<'a, B>>>,
}

impl<'a, B: RegisterBus> SharedUdma<'a, B> {
    /// Create an empty slot (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(None),
        }
    }

    /// Move a driver into the slot, returning the previous one if any.
    pub fn install(&self, udma: Udma<'a, B>) -> Option<Udma<'a, B>> {
        self.inner.replace(Some(udma))
    }

    /// Move the driver out of the slot.
    pub fn take(&self) -> Option<Udma<'a, B>> {
        self.inner.replace(None)
    }

    /// Check whether a driver is installed.
    pub fn is_installed(&self) -> bool {
        self.inner.with(|slot| slot.is_some())
    }

    /// Execute a closure with exclusive access to the driver.
    ///
    /// Returns `None` when no driver is installed. Interrupts are disabled
    /// for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Udma<'a, B>) -> R,
    {
        self.inner.with(|slot| slot.as_mut().map(f))
    }

    /// Try to execute a closure, returning `None` if the driver is already
    /// borrowed or not installed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Udma<'a, B>) -> R,
    {
        self.inner.try_with(|slot| slot.as_mut().map(f)).flatten()
    }
}

impl<B: RegisterBus> Default for SharedUdma<'_, B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared driver on the memory-mapped bus with a `'static` control table.
pub type SharedUdmaMmio = SharedUdma<'static, Mmio>;

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::driver::config::{Channel, ChannelConfig, State};
    use crate::driver::table::ControlTable;
    use crate::hal::clock::ClockController;
    use crate::test_utils::MockBus;

    static CONFIGS: [ChannelConfig; 1] = [ChannelConfig::new(Channel::at(30))];

    fn driver(table: &mut ControlTable) -> Udma<'_, MockBus> {
        Udma::with_clock(MockBus::new(), table, ClockController::with_settle_iterations(0))
    }

    #[test]
    fn empty_slot_yields_none() {
        let shared: SharedUdma<'_, MockBus> = SharedUdma::new();
        assert!(!shared.is_installed());
        assert_eq!(shared.with(|udma| udma.state()), None);
        assert_eq!(shared.try_with(|udma| udma.state()), None);
    }

    #[test]
    fn install_then_with() {
        let mut table = ControlTable::new();
        let shared = SharedUdma::default();
        assert!(shared.install(driver(&mut table)).is_none());

        let result = shared.with(|udma| udma.init(&CONFIGS));
        assert_eq!(result, Some(Ok(())));
        assert_eq!(shared.with(|udma| udma.state()), Some(State::Initialized));
    }

    #[test]
    fn try_with_nested_is_refused() {
        let mut table = ControlTable::new();
        let shared = SharedUdma::new();
        shared.install(driver(&mut table));

        let nested = shared.with(|_| shared.try_with(|udma| udma.state()));
        assert_eq!(nested, Some(None));
    }

    #[test]
    fn take_empties_slot() {
        let mut table = ControlTable::new();
        let shared = SharedUdma::new();
        shared.install(driver(&mut table));

        let udma = shared.take();
        assert!(udma.is_some());
        assert!(!shared.is_installed());
    }

    #[test]
    fn static_slot() {
        static SHARED: SharedUdma<'static, MockBus> = SharedUdma::new();

        let table = std::boxed::Box::leak(std::boxed::Box::new(ControlTable::new()));
        SHARED.install(driver(table));
        let started = SHARED.with(|udma| {
            udma.init(&CONFIGS)?;
            udma.start_transfer(Channel::at(30), 16)
        });
        assert_eq!(started, Some(Ok(())));
        assert_eq!(SHARED.with(|udma| udma.is_enabled(Channel::at(30))), Some(true));
    }
}
