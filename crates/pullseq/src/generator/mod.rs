mod builder;
mod emitter;
mod handle;
mod state;

pub use builder::*;
pub use emitter::*;
pub use handle::*;
pub use state::*;
