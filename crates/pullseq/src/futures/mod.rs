#[cfg(any(feature = "async-tokio", feature = "async-smol"))]
mod runtime;
mod stream;
mod unblock;

#[cfg_attr(docsrs, doc(cfg(any(feature = "async-tokio", feature = "async-smol"))))]
#[cfg(any(feature = "async-tokio", feature = "async-smol"))]
pub use runtime::*;
#[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
pub use stream::*;
#[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
pub use unblock::*;
