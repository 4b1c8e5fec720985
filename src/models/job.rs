//! 批次任务与运行结果
//!
//! 封装"我正在生成第几批、要多少条"这一信息，以及批次和整次运行的结果

use std::fmt::Display;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

/// 单条生成记录（JSON 对象）
pub type Record = Value;

/// 单个批次任务
///
/// 由调度器切分总量时创建，只被一个 BatchWorker 消费一次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationJob {
    /// 批次索引（从0开始）
    pub batch_index: usize,
    /// 本批需要生成的记录数
    pub requested_count: usize,
}

impl GenerationJob {
    pub fn new(batch_index: usize, requested_count: usize) -> Self {
        Self {
            batch_index,
            requested_count,
        }
    }

    /// 日志中显示的批次编号（从1开始）
    pub fn display_number(&self) -> usize {
        self.batch_index + 1
    }
}

impl Display for GenerationJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[批次 #{} 数量#{}]",
            self.display_number(),
            self.requested_count
        )
    }
}

/// 批次结果
///
/// `records` 要么为空（失败），要么恰好等于 `job.requested_count`（成功）
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub job: GenerationJob,
    pub records: Vec<Record>,
    pub succeeded: bool,
    /// 实际进行的尝试次数
    pub attempts: u32,
}

impl BatchResult {
    pub fn success(job: GenerationJob, records: Vec<Record>, attempts: u32) -> Self {
        debug_assert_eq!(records.len(), job.requested_count);
        Self {
            job,
            records,
            succeeded: true,
            attempts,
        }
    }

    pub fn failed(job: GenerationJob, attempts: u32) -> Self {
        Self {
            job,
            records: Vec::new(),
            succeeded: false,
            attempts,
        }
    }
}

/// 整次运行的统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub total_requested: usize,
    pub total_generated: usize,
    pub batches_total: usize,
    pub batches_succeeded: usize,
    pub batches_failed: usize,
    /// 跨批次出现重复的 id 数量
    pub duplicate_ids: usize,
    pub duration: Duration,
}

impl RunReport {
    /// 批次成功率（0.0 - 1.0）
    pub fn success_ratio(&self) -> f64 {
        if self.batches_total == 0 {
            return 0.0;
        }
        self.batches_succeeded as f64 / self.batches_total as f64
    }

    /// 运行日志中的一行
    pub fn to_log_line(&self, batch_size: usize, concurrency: usize) -> String {
        let secs = self.duration.as_secs_f64();
        format!(
            "{}/{} 条记录 | 批大小: {} | 并发: {} | 耗时: {:.2}s ({:.2}m) | 成功率: {}/{} 批 ({:.0}%)",
            self.total_generated,
            self.total_requested,
            batch_size,
            concurrency,
            secs,
            secs / 60.0,
            self.batches_succeeded,
            self.batches_total,
            self.success_ratio() * 100.0
        )
    }
}
