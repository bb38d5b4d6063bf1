/// Lifecycle of a [`Generator`].
///
/// A generator starts [`Open`](Self::Open) once its producer has reached the
/// first [`Emitter::emit_slot`] call. It becomes [`Closed`](Self::Closed)
/// either when the producer returns or after [`Generator::close`]. Both paths
/// run the same cleanup: the channels are dropped and the producer thread is
/// joined.
///
/// [`Generator`]: crate::Generator
/// [`Generator::close`]: crate::Generator::close
/// [`Emitter::emit_slot`]: crate::Emitter::emit_slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorState {
    /// The producer thread is running and may still emit.
    Open,
    /// A stop signal has been handed to the producer; waiting for it to
    /// return.
    Closing,
    /// The producer has returned and its thread has been joined. Every
    /// further call is a no-op.
    Closed,
}
