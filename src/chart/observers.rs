//! Tiny single-threaded observer registry.
//!
//! A `Signal` is owned by whoever produces the events (the chart container for
//! resizes, the plot for pointer moves). Listeners hold a `Subscription`;
//! dropping it deregisters the listener, so a torn-down chart stops hearing
//! about its container without any explicit bookkeeping.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<T> = Box<dyn FnMut(&T)>;

struct Registry<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
    // Ids dropped while their listener was checked out by `emit`.
    removed_during_emit: Vec<u64>,
    emitting: bool,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
            removed_during_emit: Vec::new(),
            emitting: false,
        }
    }
}

pub struct Signal<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }

    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> Subscription {
        let id = {
            let mut reg = self.registry.borrow_mut();
            let id = reg.next_id;
            reg.next_id += 1;
            reg.listeners.push((id, Box::new(listener)));
            id
        };

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    let mut reg = registry.borrow_mut();
                    let before = reg.listeners.len();
                    reg.listeners.retain(|(lid, _)| *lid != id);
                    if reg.listeners.len() == before && reg.emitting {
                        reg.removed_during_emit.push(id);
                    }
                }
            })),
        }
    }

    /// Call every listener with `value`, in subscription order.
    ///
    /// Listeners may subscribe or unsubscribe while being notified; new
    /// listeners first hear the next emit.
    pub fn emit(&self, value: &T) {
        let mut active = {
            let mut reg = self.registry.borrow_mut();
            if reg.emitting {
                // Re-entrant emit from inside a listener; drop it.
                return;
            }
            reg.emitting = true;
            std::mem::take(&mut reg.listeners)
        };

        for (_, listener) in active.iter_mut() {
            listener(value);
        }

        let mut reg = self.registry.borrow_mut();
        let removed = std::mem::take(&mut reg.removed_during_emit);
        active.retain(|(id, _)| !removed.contains(id));
        // Anything subscribed during the emit goes after the existing ones.
        active.append(&mut reg.listeners);
        reg.listeners = active;
        reg.emitting = false;
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard returned by [`Signal::subscribe`].
#[must_use = "dropping a Subscription immediately deregisters the listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn cancel(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(f) = self.unsubscribe.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn dropping_subscription_stops_delivery() {
        let signal = Signal::<i32>::new();
        let seen = Rc::new(Cell::new(0));

        let s = seen.clone();
        let sub = signal.subscribe(move |v| s.set(s.get() + *v));
        signal.emit(&2);
        drop(sub);
        signal.emit(&5);

        assert_eq!(seen.get(), 2);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn listener_can_cancel_itself_during_emit() {
        let signal = Signal::<()>::new();
        let calls = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let c = calls.clone();
        let sl = slot.clone();
        let sub = signal.subscribe(move |_| {
            c.set(c.get() + 1);
            sl.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        signal.emit(&());
        signal.emit(&());

        assert_eq!(calls.get(), 1);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn outliving_the_signal_is_harmless() {
        let signal = Signal::<u8>::new();
        let sub = signal.subscribe(|_| {});
        drop(signal);
        sub.cancel();
    }
}
