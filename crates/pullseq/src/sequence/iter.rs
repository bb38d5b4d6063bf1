use core::iter::Fuse;

use super::Sequence;

/// Creates a [`Sequence`] over the items of any iterator.
///
/// The iterator is fused, so exhaustion stays sticky even for iterators that
/// resume after returning `None`.
///
/// # Example
/// ```
/// use pullseq::{Sequence, from_iter};
///
/// let mut counter = from_iter(0u64..);
/// let mut x = 0;
/// assert!(counter.next(&mut x));
/// assert_eq!(x, 0);
/// ```
pub fn from_iter<I>(iter: I) -> FromIter<I::IntoIter>
where
    I: IntoIterator,
{
    FromIter {
        iter: iter.into_iter().fuse(),
    }
}

/// A [`Sequence`] backed by an iterator. See [`from_iter`].
#[derive(Debug, Clone)]
pub struct FromIter<I> {
    iter: Fuse<I>,
}

impl<I> Sequence<I::Item> for FromIter<I>
where
    I: Iterator,
{
    fn next(&mut self, dest: &mut I::Item) -> bool {
        match self.iter.next() {
            Some(item) => {
                *dest = item;
                true
            }
            None => false,
        }
    }
}
