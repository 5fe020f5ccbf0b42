//! Synchronization primitives for ISR-safe access.

use core::cell::RefCell;
use critical_section::Mutex;

/// Cell providing interior mutability with critical section protection.
///
/// Combines `critical_section::Mutex` with `RefCell` so the same value can be
/// reached from thread mode and from interrupt handlers.
///
/// The cell is only `Sync` when its contents may move between contexts:
///
/// ```compile_fail
/// use tm4c_udma::sync::CriticalSectionCell;
///
/// static RAW: CriticalSectionCell<*mut u8> = CriticalSectionCell::new(core::ptr::null_mut());
/// ```
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Create a new cell (const, suitable for static initialization).
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Execute a closure with exclusive mutable access.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut value = self.inner.borrow_ref_mut(cs);
            f(&mut value)
        })
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .try_borrow_mut()
                .ok()
                .map(|mut value| f(&mut value))
        })
    }

    /// Swap in `value`, returning the previous contents.
    #[inline]
    pub fn replace(&self, value: T) -> T {
        critical_section::with(|cs| self.inner.borrow(cs).replace(value))
    }
}

// SAFETY: CriticalSectionCell uses critical sections to protect all access.
// The value is handed to whichever context holds the section, so it must be Send.
unsafe impl<T: Send> Sync for CriticalSectionCell<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_mutates_and_returns() {
        let cell: CriticalSectionCell<u32> = CriticalSectionCell::new(1);
        cell.with(|v| *v += 10);
        assert_eq!(cell.with(|v| *v * 2), 22);
    }

    #[test]
    fn try_with_succeeds_when_free() {
        let cell: CriticalSectionCell<u32> = CriticalSectionCell::new(42);
        assert_eq!(cell.try_with(|v| *v), Some(42));
    }

    #[test]
    fn try_with_inside_with_is_refused() {
        let cell: CriticalSectionCell<u32> = CriticalSectionCell::new(0);
        let nested = cell.with(|_| cell.try_with(|v| *v));
        assert_eq!(nested, None);
    }

    #[test]
    fn replace_returns_previous() {
        let cell: CriticalSectionCell<Option<u8>> = CriticalSectionCell::new(None);
        assert_eq!(cell.replace(Some(3)), None);
        assert_eq!(cell.replace(None), Some(3));
    }

    #[test]
    fn static_usage() {
        static CELL: CriticalSectionCell<u32> = CriticalSectionCell::new(0);
        CELL.with(|v| *v = 100);
        assert_eq!(CELL.with(|v| *v), 100);
    }

    #[test]
    fn shared_across_threads_when_send() {
        extern crate std;

        fn assert_sync<T: Sync>() {}
        assert_sync::<CriticalSectionCell<u32>>();

        static COUNT: CriticalSectionCell<u32> = CriticalSectionCell::new(0);
        let handles: std::vec::Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| COUNT.with(|v| *v += 1)))
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(COUNT.with(|v| *v), 4);
    }
}
