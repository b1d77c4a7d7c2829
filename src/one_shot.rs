// SPDX-FileCopyrightText: The reactive-tree authors
// SPDX-License-Identifier: MPL-2.0

use std::{
    cell::{Cell, RefCell},
    fmt,
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

use futures::{channel::oneshot, FutureExt as _};

use crate::{EventStream, Subscription};

struct OneShotState<E> {
    receiver: oneshot::Receiver<E>,
    value: Option<E>,
}

impl<E: Clone> OneShotState<E> {
    /// Move a delivered value into the cache.
    fn receive(&mut self) -> Option<E> {
        if self.value.is_none() {
            // A canceled sender never delivers.
            if let Ok(Some(value)) = self.receiver.try_recv() {
                self.value = Some(value);
            }
        }
        self.value.clone()
    }
}

/// Signal that resolves at most once with the first matching event.
///
/// Stops listening as soon as it has been resolved. Never resolves if no
/// matching event occurs before the underlying channel is closed.
///
/// Can be awaited or queried without blocking with [`OneShot::get()`].
/// Dropping the signal abandons interest in the event.
pub struct OneShot<E> {
    state: RefCell<OneShotState<E>>,
    subscription: Rc<RefCell<Option<Subscription>>>,
}

impl<E: Clone + 'static> OneShot<E> {
    pub(crate) fn new(stream: &EventStream<E>) -> Self {
        let (sender, receiver) = oneshot::channel();
        let sender = Cell::new(Some(sender));
        let subscription = Rc::new(RefCell::new(None));
        let weak_subscription = Rc::downgrade(&subscription);
        let handler_subscription = stream.subscribe(move |event: &E| {
            let Some(sender) = sender.take() else {
                return;
            };
            if sender.send(event.clone()).is_err() {
                log::trace!("Discarding event of an abandoned signal");
            }
            if let Some(subscription) = weak_subscription.upgrade() {
                // Released after the borrow ended, unsubscribing while the
                // channel is emitting is supported.
                let subscription = subscription.borrow_mut().take();
                drop(subscription);
            }
        });
        *subscription.borrow_mut() = Some(handler_subscription);
        Self {
            state: RefCell::new(OneShotState {
                receiver,
                value: None,
            }),
            subscription,
        }
    }

    /// The resolved value, if any.
    #[must_use]
    pub fn get(&self) -> Option<E> {
        self.state.borrow_mut().receive()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.get().is_some()
    }
}

impl<E: Clone + 'static> Future for OneShot<E> {
    type Output = E;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        if let Some(value) = &state.value {
            return Poll::Ready(value.clone());
        }
        match state.receiver.poll_unpin(cx) {
            Poll::Ready(Ok(value)) => {
                state.value = Some(value.clone());
                Poll::Ready(value)
            }
            // Canceled when the channel has been closed before any
            // matching event occurred.
            Poll::Ready(Err(oneshot::Canceled)) | Poll::Pending => Poll::Pending,
        }
    }
}

// Never pinned structurally.
impl<E> Unpin for OneShot<E> {}

impl<E> fmt::Debug for OneShot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("OneShot")
            .field("resolved", &state.value.is_some())
            .field("listening", &self.subscription.borrow().is_some())
            .finish()
    }
}
