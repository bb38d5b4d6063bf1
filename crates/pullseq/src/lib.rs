//! Pull-based lazy sequences, with producers and consumers on their own
//! threads.
//!
//! - [`Sequence`] is the core abstraction: a source the caller pulls one
//!   element at a time into storage it owns.
//! - [`Generator`] turns a push-style producer routine into a [`Sequence`].
//!   The producer runs on a dedicated thread and never runs ahead of its
//!   reader.
//! - [`multi_consume`] and [`FanOut`] feed one upstream sequence to several
//!   concurrent [`Consumer`]s, each of which sees every element.
//!
//! With the `futures` feature any sequence can be consumed as a
//! `futures::Stream`; `async-tokio` and `async-smol` provide runtime
//! adapters.
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod error;
mod fanout;
#[cfg(feature = "futures")]
mod futures;
mod generator;
mod handshake;
mod sequence;

pub use crate::error::*;
pub use crate::fanout::*;
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::sequence::*;
