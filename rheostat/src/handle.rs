//! Per-handle state cells.
//!
//! Each handle owns one [`HandleCell`]. The cell is written only by the
//! gesture stream of its own handle (or by the controller while no gesture
//! is resolving), which lets the top and bottom handles be dragged from two
//! independent pointers without sharing a lock. Values are stored as `f64`
//! bit patterns in atomics.
//!
//! The committed pair (`last_offset`, committed value) only changes on
//! [`HandleCell::commit`] or on an external re-sync; a cancelled gesture
//! falls back to it.

use std::sync::atomic::{AtomicU64, Ordering};

/// Which of the two handles an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Handle {
    /// Selects the lower end of the range.
    Top,
    /// Selects the upper end of the range.
    Bottom,
}

impl Handle {
    pub const ALL: [Handle; 2] = [Handle::Top, Handle::Bottom];

    /// The other handle.
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Point-in-time copy of a handle cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleState {
    /// Live offset along the track, updated on every drag step.
    pub offset: f64,
    /// Offset committed at the end of the last gesture.
    pub last_offset: f64,
    /// Domain value derived from the live offset.
    pub value: f64,
}

#[derive(Debug)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }

    fn store(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Release);
    }

    fn swap(&self, value: f64) -> f64 {
        f64::from_bits(self.0.swap(value.to_bits(), Ordering::AcqRel))
    }
}

/// Shared, single-writer storage for one handle.
#[derive(Debug)]
pub struct HandleCell {
    offset: AtomicF64,
    last_offset: AtomicF64,
    value: AtomicF64,
    committed_value: AtomicF64,
}

impl HandleCell {
    pub fn new(offset: f64, value: f64) -> Self {
        Self {
            offset: AtomicF64::new(offset),
            last_offset: AtomicF64::new(offset),
            value: AtomicF64::new(value),
            committed_value: AtomicF64::new(value),
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset.load()
    }

    pub fn last_offset(&self) -> f64 {
        self.last_offset.load()
    }

    pub fn value(&self) -> f64 {
        self.value.load()
    }

    /// Value as of the last commit or re-sync.
    pub fn committed_value(&self) -> f64 {
        self.committed_value.load()
    }

    pub fn snapshot(&self) -> HandleState {
        HandleState {
            offset: self.offset(),
            last_offset: self.last_offset(),
            value: self.value(),
        }
    }

    /// Stores a live drag result. Returns `true` when the derived value
    /// changed.
    pub(crate) fn update(&self, offset: f64, value: f64) -> bool {
        self.offset.store(offset);
        self.value.swap(value).to_bits() != value.to_bits()
    }

    /// Overwrites both the live and the committed state.
    ///
    /// Returns `true` when the derived value changed.
    pub(crate) fn reset(&self, offset: f64, value: f64) -> bool {
        self.offset.store(offset);
        self.last_offset.store(offset);
        self.committed_value.store(value);
        self.value.swap(value).to_bits() != value.to_bits()
    }

    /// Moves both offsets without committing anything. Values are unchanged.
    pub(crate) fn relocate(&self, offset: f64, last_offset: f64) {
        self.offset.store(offset);
        self.last_offset.store(last_offset);
    }

    /// Makes the live offset the new baseline. Calling it twice is harmless.
    pub(crate) fn commit(&self) -> f64 {
        let offset = self.offset();
        self.last_offset.store(offset);
        self.committed_value.store(self.value());
        offset
    }

    /// Drops any uncommitted movement. Returns `true` when the derived value
    /// changed.
    pub(crate) fn revert(&self) -> bool {
        let committed = self.committed_value.load();
        self.offset.store(self.last_offset());
        self.value.swap(committed).to_bits() != committed.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_swaps_handles() {
        assert_eq!(Handle::Top.opposite(), Handle::Bottom);
        assert_eq!(Handle::Bottom.opposite(), Handle::Top);
    }

    #[test]
    fn update_leaves_baseline_untouched() {
        let cell = HandleCell::new(100.0, 10.0);
        assert!(cell.update(140.0, 20.0));
        assert_eq!(
            cell.snapshot(),
            HandleState {
                offset: 140.0,
                last_offset: 100.0,
                value: 20.0,
            }
        );
        assert!(!cell.update(150.0, 20.0));
    }

    #[test]
    fn commit_is_idempotent() {
        let cell = HandleCell::new(0.0, 0.0);
        cell.update(42.0, 7.0);
        assert_eq!(cell.commit(), 42.0);
        assert_eq!(cell.commit(), 42.0);
        assert_eq!(cell.last_offset(), 42.0);
        assert!(!cell.revert());
        assert_eq!(cell.offset(), 42.0);
    }

    #[test]
    fn revert_restores_committed_offset_and_value() {
        let cell = HandleCell::new(10.0, 1.0);
        cell.update(80.0, 8.0);
        assert!(cell.revert());
        assert_eq!(
            cell.snapshot(),
            HandleState {
                offset: 10.0,
                last_offset: 10.0,
                value: 1.0,
            }
        );
    }

    #[test]
    fn relocate_keeps_the_gesture_uncommitted() {
        let cell = HandleCell::new(10.0, 1.0);
        cell.update(30.0, 3.0);
        cell.relocate(-30.0, -10.0);
        assert_eq!(
            cell.snapshot(),
            HandleState {
                offset: -30.0,
                last_offset: -10.0,
                value: 3.0,
            }
        );
        assert_eq!(cell.committed_value(), 1.0);
        assert!(cell.revert());
        assert_eq!(cell.offset(), -10.0);
        assert_eq!(cell.value(), 1.0);
    }

    #[test]
    fn reset_moves_baseline() {
        let cell = HandleCell::new(10.0, 1.0);
        cell.update(30.0, 3.0);
        assert!(cell.reset(60.0, 6.0));
        cell.update(70.0, 7.0);
        cell.revert();
        assert_eq!(cell.offset(), 60.0);
        assert_eq!(cell.value(), 6.0);
    }
}
