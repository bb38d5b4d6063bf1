use super::Copier;
use crate::{
    handshake::{Endpoint, SlotPtr},
    sequence::Sequence,
};

/// What a consumer thread tells the coordinator.
pub(crate) enum Request<T> {
    /// The consumer is blocked in `next` and lends its destination.
    Read(SlotPtr<T>),
    /// The consumer routine has returned.
    Done,
}

/// One consumer's private view of a fanned-out upstream.
///
/// Each call to [`next`](Sequence::next) lends the destination to the
/// coordinator and waits until it answers with either a copy of the current
/// upstream element or "no more values". Reading past the end keeps
/// returning `false` immediately.
pub struct SplitSequence<T> {
    link: Endpoint<Request<T>, bool>,
}

impl<T> SplitSequence<T> {
    pub(crate) const fn new(link: Endpoint<Request<T>, bool>) -> Self {
        Self { link }
    }

    /// Sends the completion sentinel. Runs unconditionally once the consumer
    /// routine returns, however many times it read.
    pub(crate) fn finish(self) {
        if !self.link.send(Request::Done) {
            #[cfg(feature = "tracing")]
            tracing::trace!("coordinator went away before the completion sentinel");
        }
    }
}

impl<T> Sequence<T> for SplitSequence<T> {
    fn next(&mut self, dest: &mut T) -> bool {
        self.link
            .exchange(Request::Read(SlotPtr::new(dest)))
            .unwrap_or(false)
    }
}

/// The coordinator's end of one [`SplitSequence`].
///
/// A split is active while its consumer is blocked in `next`, in which case
/// `pending` holds the lent destination.
pub(crate) struct Split<T> {
    link: Endpoint<bool, Request<T>>,
    pending: Option<SlotPtr<T>>,
}

impl<T> Split<T> {
    /// Wraps the endpoint and waits for the consumer's first move.
    pub(crate) fn new(link: Endpoint<bool, Request<T>>) -> Self {
        let mut split = Self {
            link,
            pending: None,
        };
        split.await_request();
        split
    }

    pub(crate) const fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    /// Copies `src` into the consumer's destination and answers "value
    /// available". Returns whether the consumer asked for another value.
    pub(crate) fn deliver<C>(&mut self, src: &T, copier: &C) -> bool
    where
        C: Copier<T> + ?Sized,
    {
        let Some(slot) = self.pending.take() else {
            return false;
        };
        // SAFETY: the consumer is blocked in `next` until the reply below, and
        // the borrow ends with this statement.
        copier.copy(src, unsafe { slot.as_mut() });
        self.reply(true)
    }

    /// Answers "no more values". Returns whether the consumer asked again.
    pub(crate) fn end(&mut self) -> bool {
        if self.pending.take().is_none() {
            return false;
        }
        self.reply(false)
    }

    fn reply(&mut self, more: bool) -> bool {
        if !self.link.send(more) {
            return false;
        }
        self.await_request()
    }

    /// A panicked consumer drops its endpoint without a sentinel; that counts
    /// as completion too.
    fn await_request(&mut self) -> bool {
        self.pending = match self.link.recv() {
            Some(Request::Read(slot)) => Some(slot),
            Some(Request::Done) | None => None,
        };
        self.pending.is_some()
    }
}
