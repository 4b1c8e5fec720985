//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批次调度和结果汇总，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `scheduler` - 批次调度器
//! - 按批大小切分总数（Vec<GenerationJob>）
//! - 控制并发数量（Semaphore）
//! - 按完成顺序收集批次结果
//!
//! ### `aggregator` - 结果汇总器
//! - 合并成功批次的记录
//! - 统计成功/失败批次，生成 RunReport
//!
//! ## 层次关系
//!
//! ```text
//! scheduler (处理 Vec<GenerationJob>)
//!     ↓
//! workflow::BatchWorker (处理单个批次，含重试)
//!     ↓
//! services (能力层：prompt / backend / extract / validate)
//!     ↓
//! aggregator (Vec<BatchResult> → CatalogOutcome)
//! ```

pub mod aggregator;
pub mod scheduler;

pub use aggregator::{Aggregator, CatalogOutcome};
pub use scheduler::{plan_jobs, Scheduler};
