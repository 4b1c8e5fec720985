//! # Catalog Synth
//!
//! 一个通过 LLM 批量生成商品目录数据的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 数据模型（Models）
//! - `models/` - 批次任务、批次结果、运行统计、商品结构
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单次请求
//! - `prompt_builder` - 构建提示词
//! - `LlmService` - 调用 LLM 生成文本（`GenerationBackend` 的实现）
//! - `payload_extractor` / `payload_validator` - 提取并校验 JSON 列表
//! - `CatalogWriter` / `RunLogWriter` - 写输出文件和运行日志
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个批次"的完整处理流程
//! - `BatchWorker` - 请求 → 提取 → 解析 → 校验，失败时固定间隔重试
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/scheduler` - 切分批次，使用 Semaphore 控制并发
//! - `orchestrator/aggregator` - 合并结果，生成运行统计
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult, AttemptError};
pub use models::{BatchResult, GenerationJob, Product, Record, RunReport};
pub use orchestrator::{Aggregator, CatalogOutcome, Scheduler};
pub use services::{GenerationBackend, GenerationRequest, LlmService};
pub use workflow::{BatchWorker, RetryPolicy};
