//! Session event bus.
//!
//! The request pipeline announces an unrecoverable session here instead of
//! reaching into the UI. Delivery is synchronous and in-process: `publish`
//! calls every current subscriber before returning. There is no replay for
//! late subscribers.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::trace;

/// Events published on a [`SessionEventBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    /// The session is no longer valid and could not be renewed.
    Expired,
}

type Handler = dyn Fn(&SessionEvent) + Send + Sync;

struct Entry {
    active: AtomicBool,
    handler: Box<Handler>,
}

#[derive(Default)]
struct BusInner {
    subscribers: Mutex<Vec<Arc<Entry>>>,
}

/// Publish/subscribe channel for [`SessionEvent`]s.
///
/// Cheap to clone; clones share the same subscriber list.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use verigov_core::{SessionEvent, SessionEventBus};
///
/// let bus = SessionEventBus::new();
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = seen.clone();
/// let subscription = bus.subscribe(move |_| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// bus.publish(SessionEvent::Expired);
/// subscription.unsubscribe();
/// bus.publish(SessionEvent::Expired);
///
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone, Default)]
pub struct SessionEventBus {
    inner: Arc<BusInner>,
}

impl SessionEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. It stays registered until
    /// [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        let entry = Arc::new(Entry {
            active: AtomicBool::new(true),
            handler: Box::new(handler),
        });

        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());

        Subscription {
            entry,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every current subscriber and return how many
    /// handlers ran.
    ///
    /// The subscriber list is snapshotted before dispatch, so handlers may
    /// subscribe or unsubscribe (themselves or others) while running.
    /// A handler unsubscribed mid-dispatch is skipped if not yet called.
    pub fn publish(&self, event: SessionEvent) -> usize {
        let snapshot: Vec<Arc<Entry>> = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut delivered = 0;
        for entry in snapshot {
            if entry.active.load(Ordering::Acquire) {
                (entry.handler)(&event);
                delivered += 1;
            }
        }

        trace!(?event, delivered, "Session event published");
        delivered
    }

    /// Returns the number of registered handlers.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl fmt::Debug for SessionEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle returned by [`SessionEventBus::subscribe`].
///
/// Dropping the handle does not unsubscribe.
pub struct Subscription {
    entry: Arc<Entry>,
    bus: Weak<BusInner>,
}

impl Subscription {
    /// Remove the handler. Safe to call more than once and from inside a
    /// handler during dispatch.
    pub fn unsubscribe(&self) {
        if !self.entry.active.swap(false, Ordering::AcqRel) {
            return;
        }

        if let Some(bus) = self.bus.upgrade() {
            bus.subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|entry| !Arc::ptr_eq(entry, &self.entry));
        }
    }

    /// Returns true until [`Subscription::unsubscribe`] has been called.
    pub fn is_active(&self) -> bool {
        self.entry.active.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter(bus: &SessionEventBus) -> (Subscription, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let sub = bus.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (sub, count)
    }

    #[test]
    fn publish_reaches_every_subscriber() {
        let bus = SessionEventBus::new();
        let (_a, a) = counter(&bus);
        let (_b, b) = counter(&bus);

        assert_eq!(bus.publish(SessionEvent::Expired), 2);
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let bus = SessionEventBus::new();
        assert_eq!(bus.publish(SessionEvent::Expired), 0);
    }

    #[test]
    fn late_subscriber_gets_no_replay() {
        let bus = SessionEventBus::new();
        bus.publish(SessionEvent::Expired);
        let (_sub, count) = counter(&bus);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_twice_is_safe() {
        let bus = SessionEventBus::new();
        let (sub, count) = counter(&bus);

        sub.unsubscribe();
        sub.unsubscribe();
        bus.publish(SessionEvent::Expired);

        assert!(!sub.is_active());
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn handler_can_unsubscribe_itself_during_dispatch() {
        let bus = SessionEventBus::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let count = Arc::new(AtomicUsize::new(0));

        let own = slot.clone();
        let seen = count.clone();
        let sub = bus.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            if let Some(sub) = own.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
        });
        *slot.lock().unwrap() = Some(sub);

        bus.publish(SessionEvent::Expired);
        bus.publish(SessionEvent::Expired);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn handler_unsubscribed_mid_dispatch_is_skipped() {
        let bus = SessionEventBus::new();
        let victim_slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let victim = victim_slot.clone();
        let _first = bus.subscribe(move |_| {
            if let Some(sub) = victim.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
        });
        let (second, second_count) = counter(&bus);
        *victim_slot.lock().unwrap() = Some(second);

        assert_eq!(bus.publish(SessionEvent::Expired), 1);
        assert_eq!(second_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clones_share_subscribers() {
        let bus = SessionEventBus::new();
        let (_sub, count) = counter(&bus);

        bus.clone().publish(SessionEvent::Expired);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
