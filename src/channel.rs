// SPDX-FileCopyrightText: The reactive-tree authors
// SPDX-License-Identifier: MPL-2.0

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use crate::OneShot;

type Handler<E> = Rc<dyn Fn(&E)>;

type Predicate<E> = Rc<dyn Fn(&E) -> bool>;

struct ChannelState<E> {
    subscribers: Vec<(u64, Handler<E>)>,
    next_subscriber_id: u64,
    closed: bool,
}

impl<E> ChannelState<E> {
    fn is_subscribed(&self, subscriber_id: u64) -> bool {
        self.subscribers.iter().any(|(id, _)| *id == subscriber_id)
    }
}

/// Synchronous broadcast channel.
///
/// Events are delivered to all subscribers in the order of subscription
/// before [`Channel::emit()`] returns. Handlers may freely re-enter the
/// channel, i.e. emit, subscribe or unsubscribe while being notified.
pub(crate) struct Channel<E> {
    name: &'static str,
    state: Rc<RefCell<ChannelState<E>>>,
}

impl<E> Channel<E> {
    pub(crate) fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }
}

impl<E: 'static> Channel<E> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Rc::new(RefCell::new(ChannelState {
                subscribers: Vec::new(),
                next_subscriber_id: 0,
                closed: false,
            })),
        }
    }

    /// Deliver an event to all current subscribers.
    ///
    /// Silently discarded once the channel has been closed.
    pub(crate) fn emit(&self, event: &E) {
        let subscribers = {
            let state = self.state.borrow();
            if state.closed {
                log::trace!("Dropping event on closed channel {name}", name = self.name);
                return;
            }
            state.subscribers.clone()
        };
        for (subscriber_id, handler) in subscribers {
            {
                let state = self.state.borrow();
                if state.closed {
                    log::trace!(
                        "Channel {name} closed during emission",
                        name = self.name
                    );
                    return;
                }
                if !state.is_subscribed(subscriber_id) {
                    // Unsubscribed by a preceding handler
                    continue;
                }
            }
            handler(event);
        }
    }

    fn subscribe(&self, handler: Handler<E>) -> Subscription {
        let subscriber_id = {
            let mut state = self.state.borrow_mut();
            if state.closed {
                log::debug!(
                    "Ignoring subscription to closed channel {name}",
                    name = self.name
                );
                return Subscription::inert();
            }
            let subscriber_id = state.next_subscriber_id;
            state.next_subscriber_id += 1;
            state.subscribers.push((subscriber_id, handler));
            subscriber_id
        };
        let state = Rc::downgrade(&self.state);
        Subscription {
            cancel: Some(Box::new(move || unsubscribe(&state, subscriber_id))),
        }
    }

    /// Close the channel and release all subscribers.
    ///
    /// Idempotent.
    pub(crate) fn close(&self) {
        let subscribers = {
            let mut state = self.state.borrow_mut();
            state.closed = true;
            std::mem::take(&mut state.subscribers)
        };
        log::debug!(
            "Closed channel {name} with {count} subscriber(s)",
            name = self.name,
            count = subscribers.len()
        );
        // Handlers may own subscriptions of this channel that need to
        // access the state when being dropped.
        drop(subscribers);
    }

    /// Read-only view onto all events of this channel.
    pub(crate) fn stream(&self) -> EventStream<E> {
        EventStream {
            channel: self.clone(),
            predicate: None,
        }
    }
}

fn unsubscribe<E>(state: &Weak<RefCell<ChannelState<E>>>, subscriber_id: u64) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let removed = {
        let mut state = state.borrow_mut();
        state
            .subscribers
            .iter()
            .position(|(id, _)| *id == subscriber_id)
            .map(|index| state.subscribers.remove(index))
    };
    // Released after the borrow ended, see `Channel::close()`.
    drop(removed);
}

impl<E> Clone for Channel<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            state: Rc::clone(&self.state),
        }
    }
}

impl<E> fmt::Debug for Channel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("subscribers", &state.subscribers.len())
            .field("closed", &state.closed)
            .finish()
    }
}

/// Subscribable, read-only view onto the events of a tree.
///
/// Obtained from the `on_*` methods of [`Tree`](crate::Tree) and
/// [`TreeNode`](crate::TreeNode). Filters are applied to each event before
/// it reaches a handler.
pub struct EventStream<E> {
    channel: Channel<E>,
    predicate: Option<Predicate<E>>,
}

impl<E: 'static> EventStream<E> {
    /// Narrow the stream to events that match the given predicate.
    ///
    /// Composes with any filter that is already in place.
    #[must_use]
    pub fn filter(self, predicate: impl Fn(&E) -> bool + 'static) -> Self {
        let Self {
            channel,
            predicate: outer,
        } = self;
        let predicate: Predicate<E> = match outer {
            Some(outer) => Rc::new(move |event: &E| outer(event) && predicate(event)),
            None => Rc::new(predicate),
        };
        Self {
            channel,
            predicate: Some(predicate),
        }
    }

    /// Invoke `handler` synchronously for every matching event.
    ///
    /// The handler stays registered until the returned [`Subscription`]
    /// is cancelled or dropped, or until the channel is closed.
    pub fn subscribe(&self, handler: impl Fn(&E) + 'static) -> Subscription {
        let handler: Handler<E> = match &self.predicate {
            Some(predicate) => {
                let predicate = Rc::clone(predicate);
                Rc::new(move |event: &E| {
                    if predicate(event) {
                        handler(event);
                    }
                })
            }
            None => Rc::new(handler),
        };
        self.channel.subscribe(handler)
    }

    /// Capture only the next matching event.
    #[must_use]
    pub fn first(self) -> OneShot<E>
    where
        E: Clone,
    {
        OneShot::new(&self)
    }

    /// Whether the underlying channel has been closed.
    ///
    /// A closed stream never delivers any events.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.channel.is_closed()
    }
}

impl<E> Clone for EventStream<E> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
            predicate: self.predicate.clone(),
        }
    }
}

impl<E> fmt::Debug for EventStream<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("channel", &self.channel)
            .field("filtered", &self.predicate.is_some())
            .finish()
    }
}

/// Registration of an event handler.
///
/// The handler is removed when the subscription is either cancelled
/// explicitly or dropped.
#[must_use = "dropping a subscription unsubscribes its handler immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    const fn inert() -> Self {
        Self { cancel: None }
    }

    /// Remove the handler from its channel.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("inert", &self.cancel.is_none())
            .finish()
    }
}
