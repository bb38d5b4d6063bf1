use core::fmt;
use std::any::Any;

/// A result type defaulting to the crate [`Error`].
///
/// Most `pullseq` APIs are infallible: they block until the handshake
/// completes and resume any panic raised by a producer or consumer. The
/// `try_*` variants return this type instead.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `pullseq` can emit.
///
/// Errors only come from the thread layer underneath a sequence: a backing
/// thread that could not be spawned, or a producer or consumer routine that
/// panicked.
/// Misusing the handshake is ruled out at compile time by the generic
/// [`Sequence`] and [`Emitter`] signatures.
///
/// [`Sequence`]: crate::Sequence
/// [`Emitter`]: crate::Emitter
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The operating system refused to start a backing thread.
    Spawn {
        /// The kind of the underlying I/O error.
        kind: std::io::ErrorKind,
        /// The rendered I/O error.
        message: String,
    },

    /// The producer routine behind a generator panicked.
    ///
    /// The generator is closed by the time this is returned; its thread has
    /// been joined.
    ProducerPanicked {
        /// The panic payload if it was a string, otherwise a placeholder.
        message: String,
    },

    /// A consumer routine driven by a fan-out panicked.
    ///
    /// Every other consumer has still been run to completion and joined.
    ConsumerPanicked {
        /// Position of the consumer in registration order.
        index: usize,
        /// The panic payload if it was a string, otherwise a placeholder.
        message: String,
    },
}

impl Error {
    pub(crate) fn producer_panicked(payload: &(dyn Any + Send)) -> Self {
        Self::ProducerPanicked {
            message: panic_message(payload),
        }
    }

    pub(crate) fn consumer_panicked(index: usize, payload: &(dyn Any + Send)) -> Self {
        Self::ConsumerPanicked {
            index,
            message: panic_message(payload),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Spawn { message, .. } => write!(fmt, "failed to spawn thread: {message}"),
            Self::ProducerPanicked { message } => write!(fmt, "producer panicked: {message}"),
            Self::ConsumerPanicked { index, message } => {
                write!(fmt, "consumer {index} panicked: {message}")
            }
        }
    }
}

impl core::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Spawn {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("<non-string panic payload>")
    }
}
