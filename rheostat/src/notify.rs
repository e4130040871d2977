//! Value-change notification.
//!
//! Drag steps may be resolved on a different thread than the one observing
//! values. Observers can either register a [`ChangeCallback`], which runs
//! synchronously on the thread that resolved the step, or drain the
//! [`Coalescer`] once per frame. The coalescer keeps only the newest change:
//! several steps inside one frame collapse into the last one, never into an
//! older one.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use smallvec::SmallVec;

/// Rounded domain values of both handles after a change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeChange {
    pub top_value: f64,
    pub bottom_value: f64,
}

/// Stable, comparable handle for a change listener.
///
/// Compares by identity (`Arc::ptr_eq`), so a listener can be registered and
/// later removed with a clone of the same handle.
#[derive(Clone)]
pub struct ChangeCallback {
    handler: Arc<dyn Fn(RangeChange) + Send + Sync>,
}

impl ChangeCallback {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(RangeChange) + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn call(&self, change: RangeChange) {
        (self.handler)(change);
    }
}

impl<F> From<F> for ChangeCallback
where
    F: Fn(RangeChange) + Send + Sync + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl PartialEq for ChangeCallback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }
}

impl Eq for ChangeCallback {}

impl std::fmt::Debug for ChangeCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeCallback").finish_non_exhaustive()
    }
}

/// Latest-value mailbox shared between a producer and a frame-driven reader.
#[derive(Debug)]
pub struct Coalescer<T> {
    slot: Mutex<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    value: Option<T>,
    sequence: u64,
}

impl<T> Default for Coalescer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Coalescer<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Pending {
                value: None,
                sequence: 0,
            }),
        }
    }

    /// Replaces any pending value. Returns the publication sequence number.
    pub fn publish(&self, value: T) -> u64 {
        let mut pending = self.slot.lock();
        pending.value = Some(value);
        pending.sequence += 1;
        pending.sequence
    }

    /// Takes the newest pending value, leaving the mailbox empty.
    pub fn take(&self) -> Option<T> {
        self.slot.lock().value.take()
    }

    /// Number of values published so far, including coalesced ones.
    pub fn sequence(&self) -> u64 {
        self.slot.lock().sequence
    }
}

impl<T: Clone> Coalescer<T> {
    /// Builds the value while holding the mailbox lock, then publishes it.
    ///
    /// Publishers that read shared state inside `produce` are ordered by the
    /// lock, so the mailbox ends on the snapshot taken last.
    pub fn publish_with<F>(&self, produce: F) -> T
    where
        F: FnOnce() -> T,
    {
        let mut pending = self.slot.lock();
        let value = produce();
        pending.value = Some(value.clone());
        pending.sequence += 1;
        value
    }

    /// Reads the pending value without consuming it.
    pub fn peek(&self) -> Option<T> {
        self.slot.lock().value.clone()
    }
}

/// Fan-out of changes to listeners and the frame mailbox.
#[derive(Debug, Default)]
pub(crate) struct ChangeNotifier {
    listeners: RwLock<SmallVec<[ChangeCallback; 2]>>,
    mailbox: Arc<Coalescer<RangeChange>>,
}

impl ChangeNotifier {
    pub(crate) fn subscribe(&self, callback: ChangeCallback) {
        self.listeners.write().push(callback);
    }

    pub(crate) fn unsubscribe(&self, callback: &ChangeCallback) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|existing| existing != callback);
        listeners.len() != before
    }

    pub(crate) fn mailbox(&self) -> Arc<Coalescer<RangeChange>> {
        Arc::clone(&self.mailbox)
    }

    pub(crate) fn emit<F>(&self, produce: F)
    where
        F: FnOnce() -> RangeChange,
    {
        let change = self.mailbox.publish_with(produce);
        // Clone out so listeners may (un)subscribe from inside the callback.
        let listeners = self.listeners.read().clone();
        for listener in &listeners {
            listener.call(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn change(top: f64, bottom: f64) -> RangeChange {
        RangeChange {
            top_value: top,
            bottom_value: bottom,
        }
    }

    #[test]
    fn coalescer_keeps_only_the_newest_value() {
        let mailbox = Coalescer::new();
        assert_eq!(mailbox.publish(1), 1);
        assert_eq!(mailbox.publish(2), 2);
        assert_eq!(mailbox.publish(3), 3);
        assert_eq!(mailbox.peek(), Some(3));
        assert_eq!(mailbox.take(), Some(3));
        assert_eq!(mailbox.take(), None);
        assert_eq!(mailbox.sequence(), 3);
    }

    #[test]
    fn coalescer_never_goes_backwards_across_threads() {
        let mailbox = Arc::new(Coalescer::new());
        let producer = {
            let mailbox = Arc::clone(&mailbox);
            std::thread::spawn(move || {
                for i in 1..=1_000u64 {
                    mailbox.publish(i);
                }
            })
        };
        let mut last_seen = 0;
        while last_seen < 1_000 {
            if let Some(value) = mailbox.take() {
                assert!(value > last_seen);
                last_seen = value;
            }
            if producer.is_finished() && mailbox.peek().is_none() {
                break;
            }
        }
        producer.join().unwrap();
        if let Some(value) = mailbox.take() {
            last_seen = value;
        }
        assert_eq!(last_seen, 1_000);
    }

    #[test]
    fn publish_with_ends_on_the_latest_snapshot() {
        let mailbox = Arc::new(Coalescer::new());
        let state = Arc::new(AtomicUsize::new(0));
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let mailbox = Arc::clone(&mailbox);
                let state = Arc::clone(&state);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        state.fetch_add(1, Ordering::SeqCst);
                        mailbox.publish_with(|| state.load(Ordering::SeqCst));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(mailbox.take(), Some(4_000));
        assert_eq!(mailbox.sequence(), 4_000);
    }

    #[test]
    fn notifier_reaches_every_listener_until_removed() {
        let notifier = ChangeNotifier::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let callback = {
            let calls = Arc::clone(&calls);
            ChangeCallback::new(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        notifier.subscribe(callback.clone());
        notifier.emit(|| change(1.0, 2.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.mailbox().take(), Some(change(1.0, 2.0)));

        assert!(notifier.unsubscribe(&callback));
        assert!(!notifier.unsubscribe(&callback));
        notifier.emit(|| change(3.0, 4.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.mailbox().peek(), Some(change(3.0, 4.0)));
    }
}
