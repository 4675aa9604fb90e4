//! API request handlers.

mod normalize;
mod session;

pub use normalize::*;
pub use session::*;
