mod coordinator;
mod interface;
mod split;

pub use coordinator::*;
pub use interface::*;
pub use split::*;
