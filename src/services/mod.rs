pub mod feed;
pub mod ordering;

pub use feed::{TaskFeed, TaskSnapshot};
pub use ordering::{TaskFilter, next_order, plan_reorder};
