//! Shared domain types: order status and queue numbering.

pub mod queue;
pub mod status;

pub use queue::{QueueNumber, QueueSequence};
pub use status::OrderStatus;
