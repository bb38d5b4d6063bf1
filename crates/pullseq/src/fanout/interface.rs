use crate::sequence::{Sequence, SequenceExt};

/// Something that consumes the values of a [`Sequence`].
///
/// [`multi_consume`](crate::multi_consume) calls [`consume`](Self::consume)
/// exactly once, on a dedicated thread, with that consumer's private view of
/// the upstream sequence. The consumer reads as much of it as it wants;
/// returning early is always allowed.
///
/// Every `FnMut(&mut dyn Sequence<T>)` is a consumer.
pub trait Consumer<T> {
    /// Consumes values from `seq`.
    fn consume(&mut self, seq: &mut dyn Sequence<T>);
}

impl<T, F> Consumer<T> for F
where
    F: FnMut(&mut dyn Sequence<T>),
{
    fn consume(&mut self, seq: &mut dyn Sequence<T>) {
        self(seq);
    }
}

/// Duplicates a value out of the fan-out's shared slot.
///
/// The coordinator reads each upstream element into one shared slot and then
/// copies it into every consumer's own destination before moving on. A
/// custom copier is needed when elements carry internal buffers that the
/// upstream reuses between elements and that must be deep-copied.
///
/// Every `Fn(&T, &mut T)` is a copier.
pub trait Copier<T> {
    /// Copies `src` into `dest`.
    fn copy(&self, src: &T, dest: &mut T);
}

/// The default [`Copier`]: plain [`Clone::clone_from`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignCopier;

impl<T: Clone> Copier<T> for AssignCopier {
    fn copy(&self, src: &T, dest: &mut T) {
        dest.clone_from(src);
    }
}

impl<T, F> Copier<T> for F
where
    F: Fn(&T, &mut T),
{
    fn copy(&self, src: &T, dest: &mut T) {
        self(src, dest);
    }
}

/// Adapters available on every [`Consumer`].
pub trait ConsumerExt<T>: Consumer<T> {
    /// Wraps the consumer so that it sees at most the first `n` elements.
    ///
    /// Once the limit is reached the wrapped consumer reads `false`, and the
    /// upstream is not pulled on its behalf any further.
    fn limit(self, n: usize) -> Limit<Self>
    where
        Self: Sized,
    {
        Limit { consumer: self, n }
    }
}

impl<T, C> ConsumerExt<T> for C where C: Consumer<T> {}

/// A [`Consumer`] that only lets the first `n` elements through. Created by
/// [`ConsumerExt::limit`].
#[derive(Debug, Clone)]
pub struct Limit<C> {
    consumer: C,
    n: usize,
}

impl<C> Limit<C> {
    /// Returns a reference to the wrapped consumer.
    pub const fn get_ref(&self) -> &C {
        &self.consumer
    }

    /// Unwraps the consumer.
    pub fn into_inner(self) -> C {
        self.consumer
    }
}

impl<T, C> Consumer<T> for Limit<C>
where
    C: Consumer<T>,
{
    fn consume(&mut self, seq: &mut dyn Sequence<T>) {
        let mut limited = seq.take(self.n);
        self.consumer.consume(&mut limited);
    }
}
