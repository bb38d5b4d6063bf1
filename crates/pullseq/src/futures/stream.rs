use core::{
    mem,
    pin::Pin,
    task::{Context, Poll},
};

use ::futures::Stream;

use super::Unblock;
use crate::sequence::Sequence;

/// Extension trait for consuming a [`Sequence`] as an async [`Stream`].
///
/// The sequence is moved into the stream. Every element is pulled with one
/// blocking [`Sequence::next`] call dispatched through the [`Unblock`]
/// provider `U`, so the polling task itself never blocks.
pub trait SequenceAsyncExt<T>: Sequence<T> {
    /// Turns the sequence into a stream of its elements.
    ///
    /// `buf` is the destination every pull writes into; each yielded item is a
    /// clone of it. The stream ends once the sequence is exhausted, and stays
    /// ended.
    fn into_stream<U>(self, buf: T) -> SequenceStream<Self, T, U>
    where
        Self: Sized + Send + 'static,
        T: Clone + Send + 'static,
        U: Unblock,
    {
        SequenceStream {
            state: State::Idle(self, buf),
        }
    }
}

impl<S, T> SequenceAsyncExt<T> for S where S: Sequence<T> + ?Sized {}

/// A [`Stream`] over a blocking [`Sequence`]. Created by
/// [`SequenceAsyncExt::into_stream`].
///
/// Dropping the stream while a pull is in flight lets that pull finish in the
/// background; the sequence is dropped on the blocking thread afterwards.
pub struct SequenceStream<S, T, U>
where
    S: Send + 'static,
    T: Send + 'static,
    U: Unblock,
{
    state: State<S, T, U::Task<(S, T, bool)>>,
}

enum State<S, T, F> {
    Idle(S, T),
    Pulling(F),
    Done,
}

// The sequence and buffer are moved in and out of the blocking task by value
// and are never pinned.
impl<S, T, U> Unpin for SequenceStream<S, T, U>
where
    S: Send + 'static,
    T: Send + 'static,
    U: Unblock,
{
}

impl<S, T, U> SequenceStream<S, T, U>
where
    S: Send + 'static,
    T: Send + 'static,
    U: Unblock,
{
    /// Returns `true` once the underlying sequence has reported exhaustion.
    pub const fn is_terminated(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

impl<S, T, U> Stream for SequenceStream<S, T, U>
where
    S: Sequence<T> + Send + 'static,
    T: Clone + Send + 'static,
    U: Unblock,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        loop {
            match mem::replace(&mut this.state, State::Done) {
                State::Idle(mut seq, mut buf) => {
                    this.state = State::Pulling(U::unblock(move || {
                        let more = seq.next(&mut buf);
                        (seq, buf, more)
                    }));
                }
                State::Pulling(mut task) => match Pin::new(&mut task).poll(cx) {
                    Poll::Pending => {
                        this.state = State::Pulling(task);
                        return Poll::Pending;
                    }
                    Poll::Ready(Some((seq, buf, true))) => {
                        let item = buf.clone();
                        this.state = State::Idle(seq, buf);
                        return Poll::Ready(Some(item));
                    }
                    Poll::Ready(Some((_, _, false))) => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!("sequence stream exhausted");
                        return Poll::Ready(None);
                    }
                    Poll::Ready(None) => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!("blocking pull dropped by the runtime");
                        return Poll::Ready(None);
                    }
                },
                State::Done => return Poll::Ready(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core::future::{Ready, ready};
    use std::vec::Vec;

    use futures::{StreamExt, executor::block_on};

    use super::*;
    use crate::{Generator, from_iter};

    /// Runs the work in place. Good enough for driving the state machine.
    struct Inline;

    impl Unblock for Inline {
        type Task<R: Send + 'static> = Ready<Option<R>>;

        fn unblock<F, R>(work: F) -> Self::Task<R>
        where
            F: FnOnce() -> R + Send + 'static,
            R: Send + 'static,
        {
            ready(Some(work()))
        }
    }

    /// Pretends the runtime is shutting down.
    struct Cancelled;

    impl Unblock for Cancelled {
        type Task<R: Send + 'static> = Ready<Option<R>>;

        fn unblock<F, R>(_work: F) -> Self::Task<R>
        where
            F: FnOnce() -> R + Send + 'static,
            R: Send + 'static,
        {
            ready(None)
        }
    }

    #[test]
    fn stream_yields_every_element_then_ends() {
        let mut stream = from_iter(1..=4).into_stream::<Inline>(0);
        let items: Vec<i32> = block_on((&mut stream).collect());
        assert_eq!(items, [1, 2, 3, 4]);
        assert!(stream.is_terminated());
        assert_eq!(block_on(stream.next()), None);
    }

    #[test]
    fn stream_over_generator_closes_it_on_drop() {
        let g = Generator::new(|e| {
            let mut n = 0_u32;
            while let Some(slot) = e.emit_slot() {
                *slot = n;
                n += 1;
            }
        });
        let stream = g.into_stream::<Inline>(0);
        let items: Vec<u32> = block_on(stream.take(3).collect());
        assert_eq!(items, [0, 1, 2]);
    }

    #[test]
    fn cancelled_pull_ends_the_stream() {
        let mut stream = from_iter(1..=4).into_stream::<Cancelled>(0);
        assert_eq!(block_on(stream.next()), None);
        assert!(stream.is_terminated());
    }
}
