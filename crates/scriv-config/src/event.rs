#![forbid(unsafe_code)]

//! Change notification primitives.
//!
//! [`EventEmitter`] is a single-threaded subscriber list; [`Subscription`]
//! is the RAII guard pairing every subscribe with exactly one unsubscribe.
//!
//! # Invariants
//!
//! 1. Listeners are notified in registration order.
//! 2. Dropping a [`Subscription`] removes the listener before the next
//!    notification cycle.
//! 3. `fire` iterates a snapshot of the listener list, so a listener may
//!    subscribe or unsubscribe (including itself) mid-notification without
//!    disturbing the cycle in flight.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct EmitterInner<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// A single-threaded event channel.
///
/// Cloning creates another handle to the same subscriber list.
pub struct EventEmitter<T> {
    inner: Rc<RefCell<EmitterInner<T>>>,
}

impl<T> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> EventEmitter<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(EmitterInner {
                next_id: 1,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register a listener. The listener stays registered for the lifetime
    /// of the returned guard.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Rc::new(listener)));
            id
        };
        let weak: Weak<RefCell<EmitterInner<T>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .borrow_mut()
                    .listeners
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Notify every current listener, in registration order.
    pub fn fire(&self, payload: &T) {
        // Snapshot first: listeners may mutate the list reentrantly.
        let listeners: Vec<Listener<T>> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(payload);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// RAII guard for one registered listener; dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

/// A zero-payload external event source (resize, zoom change, …).
///
/// The host side holds the signal and calls [`Signal::fire`]; the controller
/// subscribes with [`Signal::on_fire`].
#[derive(Clone, Default)]
pub struct Signal {
    emitter: EventEmitter<()>,
}

impl Signal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&self) {
        self.emitter.fire(&());
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_fire(&self, callback: impl Fn() + 'static) -> Subscription {
        self.emitter.subscribe(move |()| callback())
    }
}

/// The external signal sources a controller watches, one per concern.
#[derive(Clone, Default)]
pub struct SignalSources {
    pub zoom_change: Signal,
    pub tab_focus_change: Signal,
    pub container_resize: Signal,
    pub font_measurement_change: Signal,
    pub pixel_ratio_change: Signal,
    pub accessibility_change: Signal,
    pub input_mode_change: Signal,
}

impl SignalSources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn listeners_fire_in_registration_order() {
        let emitter: EventEmitter<u32> = EventEmitter::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&order);
        let _a = emitter.subscribe(move |v| first.borrow_mut().push(("first", *v)));
        let second = Rc::clone(&order);
        let _b = emitter.subscribe(move |v| second.borrow_mut().push(("second", *v)));

        emitter.fire(&7);
        assert_eq!(*order.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let emitter: EventEmitter<()> = EventEmitter::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let sub = emitter.subscribe(move |()| counter.set(counter.get() + 1));

        emitter.fire(&());
        assert_eq!(count.get(), 1);

        drop(sub);
        assert_eq!(emitter.listener_count(), 0);
        emitter.fire(&());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn reentrant_subscribe_does_not_disturb_cycle() {
        let emitter: EventEmitter<()> = EventEmitter::new();
        let count = Rc::new(Cell::new(0));
        let late_subs = Rc::new(RefCell::new(Vec::new()));

        let emitter_clone = emitter.clone();
        let counter = Rc::clone(&count);
        let keeper = Rc::clone(&late_subs);
        let _sub = emitter.subscribe(move |()| {
            counter.set(counter.get() + 1);
            let inner_counter = Rc::clone(&counter);
            keeper
                .borrow_mut()
                .push(emitter_clone.subscribe(move |()| inner_counter.set(inner_counter.get() + 10)));
        });

        // The listener registered mid-fire must not run this cycle.
        emitter.fire(&());
        assert_eq!(count.get(), 1);

        emitter.fire(&());
        assert_eq!(count.get(), 12);
    }

    #[test]
    fn subscription_outliving_emitter_is_inert() {
        let sub;
        {
            let emitter: EventEmitter<()> = EventEmitter::new();
            sub = emitter.subscribe(|()| {});
        }
        drop(sub);
    }

    #[test]
    fn signal_delivers_zero_payload_callbacks() {
        let signal = Signal::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let _sub = signal.on_fire(move || counter.set(counter.get() + 1));
        signal.fire();
        signal.fire();
        assert_eq!(count.get(), 2);
    }
}
