//! Orders - 订单数据来源
//!
//! - [`source`] - `OrderSource` trait, snapshots and change notifications
//! - [`memory`] - in-process source, seedable from a JSON file
//! - [`normalize`] - backend row → `Order`

pub mod memory;
pub mod normalize;
pub mod source;

pub use memory::MemoryOrderSource;
pub use normalize::normalize_order;
pub use source::{ChangeKind, OrderChange, OrderSnapshot, OrderSource};
