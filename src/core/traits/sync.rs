//! Shared state between the edge interrupt and the tracking loop
//!
//! The lighthouse edge handlers mutate the pulse state from interrupt
//! context while the tracking loop snapshots it. `SharedState` hides how
//! exclusive access is obtained:
//! - `CriticalSectionState<T>` locks through an embassy critical-section
//!   mutex, so every access runs with interrupts masked
//! - `MockState<T>` uses a bare `RefCell` for single-threaded tests
//!
//! # Example
//!
//! ```
//! use lighthouse_tracker::core::traits::{MockState, SharedState};
//!
//! let state = MockState::new(0u32);
//! state.with_mut(|v| *v += 1);
//! assert_eq!(state.with(|v| *v), 1);
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

/// Exclusive access to state shared across execution contexts
///
/// Closures must stay short: on hardware they run with interrupts masked.
pub trait SharedState<T> {
    /// Access state immutably.
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R;

    /// Access state mutably.
    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R;
}

/// Interrupt-safe state behind a critical-section mutex
///
/// `new` is const, so the state can live in a `static` that both the
/// capture interrupt and the tracking loop reach.
pub struct CriticalSectionState<T> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<T>>,
}

impl<T> CriticalSectionState<T> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }
}

impl<T> SharedState<T> for CriticalSectionState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.lock(|cell| f(&cell.borrow()))
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

/// Single-threaded state for host tests
///
/// # Panics
///
/// Panics on overlapping `with`/`with_mut` borrows, which means the test
/// re-entered the state from inside a closure.
pub struct MockState<T> {
    inner: RefCell<T>,
}

impl<T> MockState<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: RefCell::new(value),
        }
    }
}

impl<T> SharedState<T> for MockState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.inner.borrow())
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(&mut self.inner.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Period {
        ticks: [u32; 2],
        available: bool,
    }

    fn take<S: SharedState<Period>>(state: &S) -> Option<[u32; 2]> {
        state.with_mut(|p| {
            if !p.available {
                return None;
            }
            p.available = false;
            Some(p.ticks)
        })
    }

    #[test]
    fn mock_state_read_and_write() {
        let state = MockState::new(42u32);
        assert_eq!(state.with(|v| *v), 42);
        state.with_mut(|v| *v = 100);
        assert_eq!(state.with(|v| *v), 100);
    }

    #[test]
    fn critical_section_state_read_and_write() {
        let state = CriticalSectionState::new(7u32);
        state.with_mut(|v| *v *= 3);
        assert_eq!(state.with(|v| *v), 21);
    }

    #[test]
    fn consume_on_read_through_either_backend() {
        let mock = MockState::new(Period { ticks: [1, 2], available: true });
        assert_eq!(take(&mock), Some([1, 2]));
        assert_eq!(take(&mock), None);

        let locked = CriticalSectionState::new(Period { ticks: [3, 4], available: true });
        assert_eq!(take(&locked), Some([3, 4]));
        assert_eq!(take(&locked), None);
    }

    #[test]
    fn static_state_is_const_constructible() {
        static COUNTER: CriticalSectionState<u32> = CriticalSectionState::new(0);
        COUNTER.with_mut(|v| *v += 1);
        assert!(COUNTER.with(|v| *v) >= 1);
    }

    #[test]
    #[should_panic(expected = "already borrowed")]
    fn mock_state_reentry_panics() {
        let state = MockState::new(0u32);
        state.with(|_v| {
            let _ = state.inner.borrow_mut();
        });
    }
}
