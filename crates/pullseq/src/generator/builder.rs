use alloc::string::String;
use core::{fmt, marker::PhantomData};
use std::thread;

use super::{Emitter, Generator};
use crate::error::Result;

/// Configures the thread backing a [`Generator`].
///
/// # Example
/// ```
/// use pullseq::{Generator, Sequence};
///
/// let mut g = Generator::builder()
///     .name("countdown")
///     .stack_size(256 * 1024)
///     .spawn(|e| {
///         for n in (1..=3).rev() {
///             if !e.emit(n) {
///                 return;
///             }
///         }
///     })?;
///
/// let mut x = 0;
/// assert!(g.next(&mut x));
/// assert_eq!(x, 3);
/// # Ok::<(), pullseq::Error>(())
/// ```
pub struct GeneratorBuilder<T> {
    name: Option<String>,
    stack_size: Option<usize>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> GeneratorBuilder<T> {
    /// Returns a builder with the platform's default thread settings.
    pub const fn new() -> Self {
        Self {
            name: None,
            stack_size: None,
            _marker: PhantomData,
        }
    }

    /// Names the producer thread. The name shows up in panic messages and
    /// in `tracing` output.
    #[must_use]
    pub fn name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    /// Sets the stack size of the producer thread, in bytes.
    #[must_use]
    pub fn stack_size(self, size: usize) -> Self {
        Self {
            stack_size: Some(size),
            ..self
        }
    }

    /// Starts `producer` on its own thread and returns the generator driving
    /// it.
    ///
    /// Blocks until the producer reaches its first
    /// [`Emitter::emit_slot`](crate::Emitter::emit_slot) call or returns.
    ///
    /// # Errors
    ///
    /// - [`Error::Spawn`](crate::Error::Spawn) if the thread could not be
    ///   created.
    /// - [`Error::ProducerPanicked`](crate::Error::ProducerPanicked) if the
    ///   producer panicked before asking for its first slot.
    pub fn spawn<F>(self, producer: F) -> Result<Generator<T>>
    where
        T: Send + 'static,
        F: FnOnce(&mut Emitter<T>) + Send + 'static,
    {
        Generator::start(self.thread_builder(), producer).map_err(|fault| fault.into_error())
    }

    pub(crate) fn thread_builder(&self) -> thread::Builder {
        let mut builder = thread::Builder::new();
        if let Some(name) = self.name.clone() {
            builder = builder.name(name);
        }
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        builder
    }
}

impl<T> Default for GeneratorBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for GeneratorBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            stack_size: self.stack_size,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for GeneratorBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorBuilder")
            .field("name", &self.name)
            .field("stack_size", &self.stack_size)
            .finish()
    }
}
