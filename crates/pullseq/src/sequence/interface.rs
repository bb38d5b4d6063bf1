use alloc::{boxed::Box, vec::Vec};

use super::Take;

/// A pull-based source of `T` values.
///
/// Each call to [`Sequence::next`] asks for one element and writes it into
/// caller-owned storage. Returning `true` means `dest` now holds the next
/// element. Returning `false` means there are no more elements; `dest` is
/// left unspecified.
///
/// Exhaustion is sticky: once a finite sequence returns `false` it must keep
/// returning `false`. Infinite sequences never return `false`.
///
/// The trait is object safe. Consumers driven by [`multi_consume`] receive a
/// `&mut dyn Sequence<T>`.
///
/// # Example
/// ```
/// use pullseq::{Sequence, from_iter};
///
/// let mut seq = from_iter([1, 2, 3]);
/// let mut x = 0;
/// let mut total = 0;
/// while seq.next(&mut x) {
///     total += x;
/// }
/// assert_eq!(total, 6);
/// assert!(!seq.next(&mut x));
/// ```
///
/// [`multi_consume`]: crate::multi_consume
pub trait Sequence<T> {
    /// Writes the next element into `dest` and returns `true`, or returns
    /// `false` once the sequence is exhausted.
    fn next(&mut self, dest: &mut T) -> bool;
}

impl<T, S> Sequence<T> for &mut S
where
    S: Sequence<T> + ?Sized,
{
    fn next(&mut self, dest: &mut T) -> bool {
        (**self).next(dest)
    }
}

impl<T, S> Sequence<T> for Box<S>
where
    S: Sequence<T> + ?Sized,
{
    fn next(&mut self, dest: &mut T) -> bool {
        (**self).next(dest)
    }
}

/// Convenience methods available on every [`Sequence`].
pub trait SequenceExt<T>: Sequence<T> {
    /// Limits the sequence to at most `n` elements.
    ///
    /// The returned [`Take`] never pulls the inner sequence more than `n`
    /// times, so the inner sequence is left positioned right after the last
    /// element it handed out.
    fn take(self, n: usize) -> Take<Self>
    where
        Self: Sized,
    {
        Take::new(self, n)
    }

    /// Pulls every remaining element and appends it to `out`.
    ///
    /// Each element is read into a fresh `T::default()`. Never returns for an
    /// infinite sequence.
    fn append_to(&mut self, out: &mut Vec<T>)
    where
        T: Default,
    {
        loop {
            let mut value = T::default();
            if !self.next(&mut value) {
                break;
            }
            out.push(value);
        }
    }
}

impl<T, S> SequenceExt<T> for S where S: Sequence<T> + ?Sized {}
