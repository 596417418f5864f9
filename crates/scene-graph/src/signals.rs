//! Change-notification channel for tree mutations
//!
//! Every node mutation in a tree is reported through a single shared
//! [`TreeSignals`] channel. Delivery is synchronous and in registration
//! order, and always happens *after* the mutation has finished updating the
//! data structures, so a subscriber reading the tree from its handler never
//! observes a half-applied operation.
//!
//! # Reentrancy
//!
//! Handlers may freely subscribe, unsubscribe, and emit further events (for
//! example by triggering another tree mutation). A nested emission is
//! queued and delivered by the outermost dispatch in FIFO order rather than
//! dispatched recursively, so the second mutation completes and notifies
//! normally. The channel does not deduplicate nested events; a handler that
//! re-triggers the event kind it is currently handling is responsible for
//! its own termination.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use log::trace;

use crate::tree::NodeId;

/// A change in a tree, as seen by subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// A node was attached to the tree
    NodeAdded(NodeId),
    /// A node (and its subtree) was detached from the tree
    NodeRemoved(NodeId),
    /// A node's settings, payload or name changed in place
    NodeChanged(NodeId),
    /// A node's visibility flag flipped
    VisibilityChanged(NodeId, bool),
    /// Coarse-grained: the tree topology changed (add, remove, move, reorder)
    StructureChanged,
}

impl TreeEvent {
    /// Returns true for events describing topology changes
    ///
    /// These are the events a suppression scope withholds and coalesces.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            TreeEvent::NodeAdded(_) | TreeEvent::NodeRemoved(_) | TreeEvent::StructureChanged
        )
    }
}

/// Token returned by [`TreeSignals::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Callback = Rc<RefCell<dyn FnMut(&TreeEvent)>>;

struct Subscriber {
    token: Subscription,
    callback: Callback,
}

#[derive(Default)]
struct SignalsInner {
    subscribers: RefCell<Vec<Subscriber>>,
    queue: RefCell<VecDeque<TreeEvent>>,
    dispatching: Cell<bool>,
    batch_depth: Cell<usize>,
    batch_dirty: Cell<bool>,
    next_token: Cell<u64>,
}

/// Shared, multi-subscriber event channel for one tree
///
/// Cloning produces another handle to the same channel; the tree, its
/// coordinator, and any number of subscribers all share one instance.
#[derive(Clone, Default)]
pub struct TreeSignals {
    inner: Rc<SignalsInner>,
}

impl TreeSignals {
    /// Create a fresh channel with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; handlers run synchronously in registration order
    pub fn subscribe(&self, callback: impl FnMut(&TreeEvent) + 'static) -> Subscription {
        let token = Subscription(self.inner.next_token.get());
        self.inner.next_token.set(token.0 + 1);
        self.inner.subscribers.borrow_mut().push(Subscriber {
            token,
            callback: Rc::new(RefCell::new(callback)),
        });
        token
    }

    /// Remove a handler; returns false if the token is unknown
    ///
    /// Safe to call from inside a handler: a subscriber removed mid-dispatch
    /// receives no further events.
    pub fn unsubscribe(&self, token: Subscription) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.token != token);
        subscribers.len() != before
    }

    /// Number of registered handlers
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Deliver an event to all subscribers
    ///
    /// Inside a suppression scope, structural events are withheld and
    /// coalesced into a single [`TreeEvent::StructureChanged`] emitted when
    /// the outermost scope ends. During dispatch, nested emissions queue up
    /// and drain in order.
    pub fn emit(&self, event: TreeEvent) {
        if self.inner.batch_depth.get() > 0 && event.is_structural() {
            self.inner.batch_dirty.set(true);
            return;
        }
        self.inner.queue.borrow_mut().push_back(event);
        self.dispatch();
    }

    /// Open a suppression scope; see [`TreeSignals::emit`]
    ///
    /// Scopes nest: coalesced structural events are released only when the
    /// last guard drops. Multi-step operations (a move is detach-then-attach)
    /// use this so observers see one coherent change.
    pub fn batch(&self) -> BatchGuard {
        self.inner.batch_depth.set(self.inner.batch_depth.get() + 1);
        BatchGuard {
            signals: self.clone(),
        }
    }

    fn dispatch(&self) {
        if self.inner.dispatching.get() {
            return;
        }
        self.inner.dispatching.set(true);
        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            trace!("dispatching {:?}", event);
            // Snapshot so handlers can subscribe/unsubscribe mid-dispatch.
            let snapshot: Vec<(Subscription, Callback)> = self
                .inner
                .subscribers
                .borrow()
                .iter()
                .map(|s| (s.token, Rc::clone(&s.callback)))
                .collect();
            for (token, callback) in snapshot {
                let live = self
                    .inner
                    .subscribers
                    .borrow()
                    .iter()
                    .any(|s| s.token == token);
                if live {
                    (callback.borrow_mut())(&event);
                }
            }
        }
        self.inner.dispatching.set(false);
    }
}

impl std::fmt::Debug for TreeSignals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeSignals")
            .field("subscribers", &self.subscriber_count())
            .field("batch_depth", &self.inner.batch_depth.get())
            .finish()
    }
}

/// Guard holding a suppression scope open; dropping it closes the scope
#[must_use = "dropping the guard immediately ends the suppression scope"]
pub struct BatchGuard {
    signals: TreeSignals,
}

impl Drop for BatchGuard {
    fn drop(&mut self) {
        let inner = &self.signals.inner;
        let depth = inner.batch_depth.get() - 1;
        inner.batch_depth.set(depth);
        if depth == 0 && inner.batch_dirty.replace(false) {
            self.signals.emit(TreeEvent::StructureChanged);
        }
    }
}
