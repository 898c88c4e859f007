//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod call_outcome;
mod order_status;
mod room_number;

pub use call_outcome::*;
pub use order_status::*;
pub use room_number::*;
