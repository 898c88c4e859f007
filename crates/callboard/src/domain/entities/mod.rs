//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - MenuItem / Catalog: What guests can order
//! - OrderLine / Cart: What a guest is ordering
//! - CallRecord: Finalized outcome of one call

mod call_record;
mod catalog;
mod menu_item;
mod order_line;

pub use call_record::*;
pub use catalog::*;
pub use menu_item::*;
pub use order_line::*;
