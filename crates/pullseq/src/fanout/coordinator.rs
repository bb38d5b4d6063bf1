//! Fans one upstream [`Sequence`] out to many concurrently running
//! [`Consumer`]s.
//!
//! Each consumer runs on its own scoped thread against a [`SplitSequence`].
//! The coordinator stays on the calling thread and works in rounds: pull one
//! element into the shared slot, copy it to every consumer that is waiting
//! for a value, repeat. Consumers that return drop out of the rounds. Once
//! the upstream is exhausted every remaining consumer is answered "no more
//! values" until it returns too. The call only returns after every consumer
//! thread has been joined.
//!
//! ## Guarantees
//!
//! - The upstream is pulled at most once per round, and a round only starts
//!   while at least one consumer is still reading. With zero consumers, or
//!   once every consumer has stopped early, the upstream is left exactly
//!   where the last reader needed it.
//! - No consumer is ever more than one element ahead of another.
//! - A consumer that never reads, or that keeps reading past the end, is
//!   joined like any other.

use alloc::{boxed::Box, format, string::String, vec::Vec};
use std::{any::Any, panic::resume_unwind, thread};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{AssignCopier, Consumer, Copier, SplitSequence, split::Split};
use crate::{
    error::{Error, Result},
    handshake,
    sequence::Sequence,
};

type Payload = Box<dyn Any + Send + 'static>;

enum Fault {
    Spawn(std::io::Error),
    Panic { index: usize, payload: Payload },
}

impl Fault {
    fn into_error(self) -> Error {
        match self {
            Self::Spawn(err) => err.into(),
            Self::Panic { index, payload } => Error::consumer_panicked(index, &*payload),
        }
    }

    fn raise(self) -> ! {
        match self {
            Self::Spawn(err) => panic!("failed to spawn consumer thread: {err}"),
            Self::Panic { payload, .. } => resume_unwind(payload),
        }
    }
}

/// Sends every value of `upstream` to each of `consumers`.
///
/// `slot` receives each upstream element before it is copied out with
/// [`Clone::clone_from`]; use [`multi_consume_with`] for a custom
/// [`Copier`]. Returns once every consumer has returned.
///
/// # Panics
///
/// Panics if a consumer thread cannot be spawned, and resumes the first
/// consumer panic after all consumers have been joined.
///
/// # Example
/// ```
/// use pullseq::{Sequence, from_iter, multi_consume};
///
/// let mut evens = Vec::new();
/// let mut odds = Vec::new();
/// let mut keep_evens = |seq: &mut dyn Sequence<i32>| {
///     let mut x = 0;
///     while seq.next(&mut x) {
///         if x % 2 == 0 {
///             evens.push(x);
///         }
///     }
/// };
/// let mut keep_odds = |seq: &mut dyn Sequence<i32>| {
///     let mut x = 0;
///     while seq.next(&mut x) {
///         if x % 2 == 1 {
///             odds.push(x);
///         }
///     }
/// };
///
/// multi_consume(from_iter(0..5), &mut 0, &mut [&mut keep_evens, &mut keep_odds]);
/// assert_eq!(evens, [0, 2, 4]);
/// assert_eq!(odds, [1, 3]);
/// ```
pub fn multi_consume<T, S>(
    upstream: S,
    slot: &mut T,
    consumers: &mut [&mut (dyn Consumer<T> + Send)],
) where
    T: Clone + Send,
    S: Sequence<T>,
{
    multi_consume_with(upstream, slot, AssignCopier, consumers);
}

/// Like [`multi_consume`], but copies values out of `slot` with `copier`.
///
/// # Panics
///
/// See [`multi_consume`].
pub fn multi_consume_with<T, S, C>(
    mut upstream: S,
    slot: &mut T,
    copier: C,
    consumers: &mut [&mut (dyn Consumer<T> + Send)],
) where
    T: Send,
    S: Sequence<T>,
    C: Copier<T>,
{
    let threads = Threads::default();
    if let Err(fault) = coordinate(&mut upstream, slot, &copier, consumers, &threads) {
        fault.raise();
    }
}

/// Builder for a fan-out run.
///
/// # Example
/// ```
/// use pullseq::{ConsumerExt, FanOut, Sequence, SequenceExt, from_iter};
///
/// let mut counter = from_iter(0u32..);
/// let mut seen = Vec::new();
/// let mut first_three = (|seq: &mut dyn Sequence<u32>| seq.append_to(&mut seen)).limit(3);
///
/// FanOut::new(&mut counter)
///     .consumer(&mut first_three)
///     .thread_name("reader")
///     .run(&mut 0);
/// drop(first_three);
///
/// assert_eq!(seen, [0, 1, 2]);
/// let mut next = 0;
/// assert!(counter.next(&mut next));
/// assert_eq!(next, 3);
/// ```
pub struct FanOut<'a, T, S, C = AssignCopier> {
    upstream: S,
    copier: C,
    consumers: Vec<&'a mut (dyn Consumer<T> + Send + 'a)>,
    threads: Threads,
}

#[derive(Debug, Default)]
struct Threads {
    name: Option<String>,
    stack_size: Option<usize>,
}

impl Threads {
    fn builder(&self, index: usize) -> thread::Builder {
        let mut builder = thread::Builder::new();
        if let Some(prefix) = &self.name {
            builder = builder.name(format!("{prefix}-{index}"));
        }
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        builder
    }
}

impl<'a, T, S> FanOut<'a, T, S>
where
    S: Sequence<T>,
{
    /// Starts a fan-out over `upstream` with the default [`AssignCopier`].
    pub const fn new(upstream: S) -> Self {
        Self {
            upstream,
            copier: AssignCopier,
            consumers: Vec::new(),
            threads: Threads {
                name: None,
                stack_size: None,
            },
        }
    }
}

impl<'a, T, S, C> FanOut<'a, T, S, C>
where
    S: Sequence<T>,
{
    /// Replaces the copier used to duplicate each element.
    pub fn copier<D>(self, copier: D) -> FanOut<'a, T, S, D>
    where
        D: Copier<T>,
    {
        FanOut {
            upstream: self.upstream,
            copier,
            consumers: self.consumers,
            threads: self.threads,
        }
    }

    /// Registers a consumer. Consumers are started in registration order.
    #[must_use]
    pub fn consumer<K>(mut self, consumer: &'a mut K) -> Self
    where
        K: Consumer<T> + Send + 'a,
    {
        self.consumers.push(consumer);
        self
    }

    /// Names consumer threads `"{prefix}-{index}"`.
    #[must_use]
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.threads.name = Some(prefix.into());
        self
    }

    /// Sets the stack size of every consumer thread, in bytes.
    #[must_use]
    pub fn stack_size(mut self, size: usize) -> Self {
        self.threads.stack_size = Some(size);
        self
    }

    /// Returns the number of registered consumers.
    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    /// Returns `true` if no consumer has been registered.
    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }
}

impl<T, S, C> FanOut<'_, T, S, C>
where
    T: Send,
    S: Sequence<T>,
    C: Copier<T>,
{
    /// Runs the fan-out to completion, using `slot` as the shared per-round
    /// destination.
    ///
    /// # Panics
    ///
    /// See [`multi_consume`].
    pub fn run(self, slot: &mut T) {
        if let Err(fault) = self.execute(slot) {
            fault.raise();
        }
    }

    /// A fallible version of [`Self::run`].
    ///
    /// # Errors
    ///
    /// - [`Error::Spawn`] if a consumer thread could not be spawned, for
    ///   example because of an oversized [`stack_size`](Self::stack_size).
    ///   The consumers already started are answered "no more values" without
    ///   the upstream being touched, and joined.
    /// - [`Error::ConsumerPanicked`] for the first consumer that panicked.
    ///   The others still ran to completion.
    pub fn try_run(self, slot: &mut T) -> Result<()> {
        self.execute(slot).map_err(Fault::into_error)
    }

    fn execute(mut self, slot: &mut T) -> Result<(), Fault> {
        coordinate(
            &mut self.upstream,
            slot,
            &self.copier,
            &mut self.consumers,
            &self.threads,
        )
    }
}

#[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all, fields(consumers = consumers.len())))]
fn coordinate<T, S, C>(
    upstream: &mut S,
    slot: &mut T,
    copier: &C,
    consumers: &mut [&mut (dyn Consumer<T> + Send + '_)],
    threads: &Threads,
) -> Result<(), Fault>
where
    T: Send,
    S: Sequence<T> + ?Sized,
    C: Copier<T> + ?Sized,
{
    thread::scope(|s| {
        let mut splits = Vec::with_capacity(consumers.len());
        let mut handles = Vec::with_capacity(consumers.len());
        let mut spawn_error = None;

        for (index, consumer) in consumers.iter_mut().enumerate() {
            let (coordinator_side, consumer_side) = handshake::pair();
            let spawned = threads.builder(index).spawn_scoped(s, move || {
                let mut split = SplitSequence::new(consumer_side);
                consumer.consume(&mut split);
                split.finish();

                #[cfg(feature = "tracing")]
                tracing::trace!(index, "consumer returned");
            });
            match spawned {
                Ok(handle) => {
                    handles.push(handle);
                    splits.push(Split::new(coordinator_side));
                }
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(index, "failed to spawn consumer thread: {err}");

                    spawn_error = Some(err);
                    break;
                }
            }
        }

        if spawn_error.is_none() {
            broadcast(upstream, slot, copier, &mut splits);
        }
        drain(&mut splits);
        drop(splits);

        let mut first_panic = None;
        for (index, handle) in handles.into_iter().enumerate() {
            if let Err(payload) = handle.join() {
                first_panic.get_or_insert(Fault::Panic { index, payload });
            }
        }

        match (spawn_error, first_panic) {
            (Some(err), _) => Err(Fault::Spawn(err)),
            (None, Some(fault)) => Err(fault),
            (None, None) => Ok(()),
        }
    })
}

/// Runs rounds until the upstream is exhausted or nobody is reading.
fn broadcast<T, S, C>(upstream: &mut S, slot: &mut T, copier: &C, splits: &mut [Split<T>])
where
    S: Sequence<T> + ?Sized,
    C: Copier<T> + ?Sized,
{
    let mut active = splits.iter().any(Split::is_active);
    #[cfg(feature = "tracing")]
    let mut rounds = 0_usize;

    while active && upstream.next(slot) {
        active = false;
        for split in splits.iter_mut() {
            active |= split.deliver(slot, copier);
        }

        #[cfg(feature = "tracing")]
        {
            rounds += 1;
            tracing::trace!(rounds, active, "fan-out round complete");
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        rounds,
        upstream_exhausted = active,
        "fan-out rounds finished"
    );
}

/// Answers "no more values" until every consumer has returned.
fn drain<T>(splits: &mut [Split<T>]) {
    let mut active = splits.iter().any(Split::is_active);
    while active {
        active = false;
        for split in splits.iter_mut() {
            active |= split.end();
        }
    }
}
