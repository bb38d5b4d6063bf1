use alloc::boxed::Box;
use core::fmt;
use std::{
    any::Any,
    panic::resume_unwind,
    thread::{self, JoinHandle},
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{Emitter, GeneratorBuilder, GeneratorState, emitter::Signal};
use crate::{
    error::{Error, Result},
    handshake::{self, Endpoint, SlotPtr},
    sequence::Sequence,
};

type Payload = Box<dyn Any + Send + 'static>;

/// Why a generator could not be started or driven.
pub(crate) enum Fault {
    Spawn(std::io::Error),
    Panic(Payload),
}

impl Fault {
    pub(crate) fn into_error(self) -> Error {
        match self {
            Self::Spawn(err) => err.into(),
            Self::Panic(payload) => Error::producer_panicked(&*payload),
        }
    }

    /// Re-raises the fault on the current thread, the way
    /// [`std::thread::spawn`] would.
    fn raise(self) -> ! {
        match self {
            Self::Spawn(err) => panic!("failed to spawn generator thread: {err}"),
            Self::Panic(payload) => resume_unwind(payload),
        }
    }
}

/// A closable [`Sequence`] backed by a producer routine running on its own
/// thread.
///
/// The producer is written in push style against an [`Emitter`]; callers pull
/// values with [`Sequence::next`]. The two sides meet in a strict
/// one-value-at-a-time rendezvous, so the producer never runs ahead of its
/// reader.
///
/// The generator owns its thread. Closing it, letting the producer return,
/// or dropping it all converge on the same cleanup, which joins the thread.
/// A panic inside the producer is resumed on the thread that observes it
/// (use [`try_next`](Self::try_next) / [`try_close`](Self::try_close) to
/// receive it as an [`Error`] instead).
///
/// # Example
/// ```
/// use pullseq::{Generator, Sequence, SequenceExt};
///
/// let mut fib = Generator::new(|e| {
///     let (mut a, mut b) = (0u64, 1u64);
///     while let Some(slot) = e.emit_slot() {
///         *slot = a;
///         (a, b) = (b, a + b);
///     }
/// });
///
/// let mut first = Vec::new();
/// (&mut fib).take(7).append_to(&mut first);
/// assert_eq!(first, [0, 1, 1, 2, 3, 5, 8]);
///
/// fib.close();
/// assert!(!fib.next(&mut 0));
/// ```
pub struct Generator<T> {
    link: Option<Endpoint<Option<SlotPtr<T>>, Signal>>,
    handle: Option<JoinHandle<()>>,
    state: GeneratorState,
}

impl<T> Generator<T>
where
    T: Send + 'static,
{
    /// Starts `producer` on a new thread with default settings.
    ///
    /// Blocks until the producer asks for its first slot or returns.
    ///
    /// # Panics
    ///
    /// Panics if the thread cannot be spawned, and resumes the producer's
    /// panic if it panics before its first `emit_slot` call. See
    /// [`GeneratorBuilder::spawn`] for the fallible version.
    pub fn new<F>(producer: F) -> Self
    where
        F: FnOnce(&mut Emitter<T>) + Send + 'static,
    {
        match Self::start(thread::Builder::new(), producer) {
            Ok(generator) => generator,
            Err(fault) => fault.raise(),
        }
    }
}

impl<T> Generator<T> {
    /// Returns a [`GeneratorBuilder`] to configure the producer thread.
    pub const fn builder() -> GeneratorBuilder<T> {
        GeneratorBuilder::new()
    }

    pub(crate) fn start<F>(builder: thread::Builder, producer: F) -> Result<Self, Fault>
    where
        T: Send + 'static,
        F: FnOnce(&mut Emitter<T>) + Send + 'static,
    {
        let (caller, producer_side) = handshake::pair();
        let handle = builder
            .spawn(move || {
                #[cfg(feature = "tracing")]
                tracing::trace!(thread = ?thread::current().name(), "producer started");

                let mut emitter = Emitter::new(producer_side);
                producer(&mut emitter);
                emitter.finish();

                #[cfg(feature = "tracing")]
                tracing::trace!(thread = ?thread::current().name(), "producer returned");
            })
            .map_err(Fault::Spawn)?;

        let mut generator = Self {
            link: Some(caller),
            handle: Some(handle),
            state: GeneratorState::Open,
        };

        // The producer's first `emit_slot` announces before it waits for a
        // destination; returning without one means the sequence is empty.
        match generator.link.as_ref().and_then(Endpoint::recv) {
            Some(Signal::Ready) => {}
            Some(Signal::Finished { .. }) | None => {
                generator.finish().map_err(Fault::Panic)?;
            }
        }
        Ok(generator)
    }

    /// Returns the current lifecycle state.
    pub const fn state(&self) -> GeneratorState {
        self.state
    }

    /// Returns `true` once the producer has returned and its thread has been
    /// joined.
    pub fn is_closed(&self) -> bool {
        self.state == GeneratorState::Closed
    }

    /// A fallible version of [`Sequence::next`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProducerPanicked`] if the producer panicked during
    /// this round. The generator is closed afterwards.
    pub fn try_next(&mut self, dest: &mut T) -> Result<bool> {
        self.round(Some(SlotPtr::new(dest)))
            .map_err(|payload| Error::producer_panicked(&*payload))
    }

    /// Stops the producer and joins its thread.
    ///
    /// The producer's pending [`Emitter::emit_slot`] returns `None`; per the
    /// emitter contract it must then return. Idempotent: closing a closed
    /// generator does nothing.
    ///
    /// # Panics
    ///
    /// Resumes the producer's panic if it panicked while shutting down.
    pub fn close(&mut self) {
        if let Err(payload) = self.shutdown() {
            resume_unwind(payload);
        }
    }

    /// A fallible version of [`Self::close`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProducerPanicked`] if the producer panicked while
    /// shutting down.
    pub fn try_close(&mut self) -> Result<()> {
        self.shutdown()
            .map_err(|payload| Error::producer_panicked(&*payload))
    }

    /// Hands `slot` to the producer and waits for its announcement.
    ///
    /// With a destination, `Ready` means the destination now holds a value.
    /// With `None` (a stop signal), `Ready` means the producer ignored the
    /// signal and asked again.
    fn round(&mut self, slot: Option<SlotPtr<T>>) -> Result<bool, Payload> {
        let Some(link) = self.link.as_ref() else {
            return Ok(false);
        };
        match link.exchange(slot) {
            Some(Signal::Ready) => Ok(true),
            Some(Signal::Finished { committed }) => {
                self.finish()?;
                Ok(committed)
            }
            None => {
                self.finish()?;
                Ok(false)
            }
        }
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(state = ?self.state)))]
    fn shutdown(&mut self) -> Result<(), Payload> {
        if self.link.is_none() {
            return Ok(());
        }
        self.state = GeneratorState::Closing;
        while self.link.is_some() {
            self.round(None)?;
        }
        Ok(())
    }

    /// The single cleanup path: release the channels, join the thread.
    fn finish(&mut self) -> Result<(), Payload> {
        self.link = None;
        self.state = GeneratorState::Closed;
        match self.handle.take() {
            Some(handle) => {
                let joined = handle.join();
                #[cfg(feature = "tracing")]
                tracing::debug!(panicked = joined.is_err(), "generator closed");
                joined
            }
            None => Ok(()),
        }
    }
}

impl<T> Sequence<T> for Generator<T> {
    /// Pulls the next value from the producer.
    ///
    /// # Panics
    ///
    /// Resumes the producer's panic if it panicked during this round.
    fn next(&mut self, dest: &mut T) -> bool {
        match self.round(Some(SlotPtr::new(dest))) {
            Ok(more) => more,
            Err(payload) => resume_unwind(payload),
        }
    }
}

impl<T> Drop for Generator<T> {
    fn drop(&mut self) {
        if let Err(payload) = self.shutdown() {
            if !thread::panicking() {
                resume_unwind(payload);
            }
        }
    }
}

impl<T> fmt::Debug for Generator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("state", &self.state)
            .field(
                "thread",
                &self.handle.as_ref().and_then(|h| h.thread().name()),
            )
            .finish()
    }
}
