use super::Sequence;

/// A [`Sequence`] that yields at most `n` elements of its inner sequence.
///
/// Created by [`SequenceExt::take`].
///
/// [`SequenceExt::take`]: crate::SequenceExt::take
#[derive(Debug, Clone)]
pub struct Take<S> {
    inner: S,
    remaining: usize,
}

impl<S> Take<S> {
    pub(crate) const fn new(inner: S, n: usize) -> Self {
        Self {
            inner,
            remaining: n,
        }
    }

    /// Returns the wrapped sequence, positioned after the last element this
    /// adapter pulled.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<T, S> Sequence<T> for Take<S>
where
    S: Sequence<T>,
{
    fn next(&mut self, dest: &mut T) -> bool {
        if self.remaining == 0 {
            return false;
        }
        if self.inner.next(dest) {
            self.remaining -= 1;
            true
        } else {
            // Sticky even if the inner sequence would misbehave later.
            self.remaining = 0;
            false
        }
    }
}
