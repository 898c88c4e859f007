//! Adapters
//!
//! Implementations of the ports that need no external infrastructure.

mod clock;
mod memory_store;

pub use clock::{FixedClock, SystemClock};
pub use memory_store::MemoryStore;
