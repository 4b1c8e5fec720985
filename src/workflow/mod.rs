pub mod batch_flow;

pub use batch_flow::{BatchWorker, RetryPolicy};
