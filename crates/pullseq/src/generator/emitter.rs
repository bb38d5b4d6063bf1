use crate::handshake::{Endpoint, SlotPtr};

/// What the producer side announces at the end of every round.
pub(crate) enum Signal {
    /// The producer is back in [`Emitter::emit_slot`]: the previous slot holds
    /// a value and the producer is waiting for the next one.
    Ready,
    /// The producer routine returned. `committed` is set when the last slot
    /// was filled through [`Emitter::emit`] right before returning.
    Finished { committed: bool },
}

/// The handle a producer routine uses to hand values to its [`Generator`].
///
/// A producer asks for a destination with [`emit_slot`](Self::emit_slot),
/// writes the value there, and asks again. Asking again is what delivers the
/// previous value: the caller's pending [`Sequence::next`] returns `true` at
/// that moment. Returning from the producer routine ends the sequence.
///
/// # Contract
///
/// When `emit_slot` returns `None` the generator has been closed. The
/// producer must return promptly. Cancellation is cooperative: a producer
/// that never calls back into the emitter makes [`Generator::close`] (and
/// dropping the generator) block forever.
///
/// [`Generator`]: crate::Generator
/// [`Generator::close`]: crate::Generator::close
/// [`Sequence::next`]: crate::Sequence::next
pub struct Emitter<T> {
    link: Endpoint<Signal, Option<SlotPtr<T>>>,
    committed: bool,
}

impl<T> Emitter<T> {
    pub(crate) const fn new(link: Endpoint<Signal, Option<SlotPtr<T>>>) -> Self {
        Self {
            link,
            committed: false,
        }
    }

    /// Delivers the previous slot (if any) and waits for the caller's next
    /// destination.
    ///
    /// Returns `None` once the generator is closed, or if its caller is gone.
    /// The producer must then return without calling back in.
    ///
    /// # Example
    /// ```
    /// use pullseq::{Generator, Sequence};
    ///
    /// let mut squares = Generator::new(|e| {
    ///     let mut n: u64 = 0;
    ///     while let Some(slot) = e.emit_slot() {
    ///         *slot = n * n;
    ///         n += 1;
    ///     }
    /// });
    ///
    /// let mut x = 0;
    /// assert!(squares.next(&mut x));
    /// assert!(squares.next(&mut x));
    /// assert_eq!(x, 1);
    /// squares.close();
    /// ```
    pub fn emit_slot(&mut self) -> Option<&mut T> {
        self.committed = false;
        let slot = self.link.exchange(Signal::Ready).flatten()?;
        // SAFETY: the caller that lent `slot` is blocked until we announce
        // again, which needs `&mut self` and so ends this borrow.
        Some(unsafe { slot.as_mut() })
    }

    /// Writes `value` into the next slot and commits it.
    ///
    /// Unlike a raw [`emit_slot`](Self::emit_slot) write, a committed value is
    /// delivered even if the producer returns right after. Returns `false`
    /// when the generator has been closed; the producer must then return.
    pub fn emit(&mut self, value: T) -> bool {
        match self.emit_slot() {
            Some(slot) => {
                *slot = value;
                self.committed = true;
                true
            }
            None => false,
        }
    }

    /// Announces that the producer routine has returned.
    pub(crate) fn finish(self) {
        if !self.link.send(Signal::Finished {
            committed: self.committed,
        }) {
            #[cfg(feature = "tracing")]
            tracing::trace!("generator caller went away before the finish announcement");
        }
    }
}
