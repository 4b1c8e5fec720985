pub mod job;
pub mod product;

pub use job::{BatchResult, GenerationJob, Record, RunReport};
pub use product::{Category, Product};
