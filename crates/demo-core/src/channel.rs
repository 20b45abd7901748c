//! The shared external channel
//!
//! The channel is a single string-or-null cell that outlives any engine
//! (for a browser host it is the location hash). The engine never owns it:
//! it reads it, writes it with replace semantics, and observes external
//! changes through a subscription.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback invoked after the channel value changed.
pub type Listener = Box<dyn Fn()>;

/// Atomic get/set access to the channel, observable for changes.
pub trait Channel {
    /// Current value, `None` when the channel is empty.
    fn get(&self) -> Option<String>;

    /// Replace the value. Does not create a navigable history entry.
    fn set(&self, value: Option<&str>);

    /// Register a listener notified after every change of the value.
    ///
    /// The listener stays registered until the returned guard is dropped.
    fn subscribe(&self, listener: Listener) -> Subscription;
}

/// Guard for a channel subscription. Unsubscribes on drop.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Create a guard running `unsubscribe` when dropped.
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Unsubscribe now.
    pub fn unsubscribe(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[derive(Default)]
struct ChannelState {
    value: RefCell<Option<String>>,
    writes: RefCell<Vec<Option<String>>>,
    listeners: RefCell<Vec<(u64, Rc<dyn Fn()>)>>,
    next_listener_id: Cell<u64>,
}

impl ChannelState {
    fn replace(&self, value: Option<&str>) -> bool {
        let changed = self.value.borrow().as_deref() != value;
        if changed {
            *self.value.borrow_mut() = value.map(str::to_string);
        }
        changed
    }

    fn notify(&self) {
        // Snapshot so listeners may subscribe or unsubscribe while notified
        let listeners: Vec<Rc<dyn Fn()>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener();
        }
    }
}

/// In-process channel.
///
/// Clones share the same cell. Writes issued through [`Channel::set`] are
/// recorded in a write log so hosts and tests can audit what an engine wrote;
/// [`MemoryChannel::navigate`] models an external edit (back/forward
/// navigation, a pasted link) and is not recorded.
#[derive(Clone, Default)]
pub struct MemoryChannel {
    state: Rc<ChannelState>,
}

impl MemoryChannel {
    /// Create a channel holding `initial`.
    pub fn new(initial: Option<&str>) -> Self {
        let channel = Self::default();
        channel.state.replace(initial);
        channel
    }

    /// Change the value from outside the engine and notify subscribers.
    pub fn navigate(&self, value: Option<&str>) {
        if self.state.replace(value) {
            tracing::trace!(?value, "Channel navigated");
            self.state.notify();
        }
    }

    /// Every value written through [`Channel::set`], oldest first.
    pub fn writes(&self) -> Vec<Option<String>> {
        self.state.writes.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.state.writes.borrow().len()
    }

    /// Forget recorded writes.
    pub fn clear_writes(&self) {
        self.state.writes.borrow_mut().clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.listeners.borrow().len()
    }
}

impl Channel for MemoryChannel {
    fn get(&self) -> Option<String> {
        self.state.value.borrow().clone()
    }

    fn set(&self, value: Option<&str>) {
        self.state.writes.borrow_mut().push(value.map(str::to_string));
        if self.state.replace(value) {
            tracing::trace!(?value, "Channel written");
            self.state.notify();
        }
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        let id = self.state.next_listener_id.get();
        self.state.next_listener_id.set(id + 1);
        self.state
            .listeners
            .borrow_mut()
            .push((id, Rc::from(listener)));

        let state: Weak<ChannelState> = Rc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                state.listeners.borrow_mut().retain(|(other, _)| *other != id);
            }
        })
    }
}

impl fmt::Debug for MemoryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryChannel")
            .field("value", &self.state.value.borrow())
            .field("writes", &self.state.writes.borrow().len())
            .field("subscribers", &self.state.listeners.borrow().len())
            .finish()
    }
}
