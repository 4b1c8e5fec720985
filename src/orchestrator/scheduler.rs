//! 批次调度器 - 编排层
//!
//! ## 职责
//!
//! 1. **切分任务**：按批大小把总数切成若干批次，最后一批可以更小
//! 2. **并发控制**：使用 Semaphore 限制同时在途的批次数量
//! 3. **收集结果**：按完成顺序收集所有批次结果
//!
//! 许可在任务内部、开始尝试之前获取，排队中的任务不占用许可。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::models::{BatchResult, GenerationJob};
use crate::utils::logging::log_batch_complete;
use crate::workflow::BatchWorker;

/// 按批大小切分总数
///
/// 所有批次的数量之和恰好等于 `total`，每批不超过 `batch_size`
pub fn plan_jobs(total: usize, batch_size: usize) -> Vec<GenerationJob> {
    if total == 0 || batch_size == 0 {
        return Vec::new();
    }

    let mut jobs = Vec::with_capacity(total.div_ceil(batch_size));
    let mut remaining = total;
    while remaining > 0 {
        let count = remaining.min(batch_size);
        jobs.push(GenerationJob::new(jobs.len(), count));
        remaining -= count;
    }
    jobs
}

/// 批次调度器
pub struct Scheduler {
    worker: Arc<BatchWorker>,
    semaphore: Arc<Semaphore>,
}

impl Scheduler {
    pub fn new(worker: BatchWorker, max_concurrency: usize) -> Self {
        Self {
            worker: Arc::new(worker),
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
        }
    }

    /// 运行全部批次，返回按完成顺序排列的结果
    pub async fn run(&self, jobs: Vec<GenerationJob>) -> Vec<BatchResult> {
        let total = jobs.len();
        let mut tasks = JoinSet::new();
        let mut pending: HashMap<tokio::task::Id, GenerationJob> = HashMap::with_capacity(total);

        for job in jobs {
            let worker = self.worker.clone();
            let semaphore = self.semaphore.clone();

            let handle = tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        error!("{} 无法获取并发许可: {}", job, e);
                        return BatchResult::failed(job, 0);
                    }
                };
                worker.run(job).await
            });
            pending.insert(handle.id(), job);
        }

        let mut results = Vec::with_capacity(total);

        while let Some(joined) = tasks.join_next_with_id().await {
            let result = match joined {
                Ok((id, result)) => {
                    pending.remove(&id);
                    result
                }
                Err(e) => {
                    let Some(job) = pending.remove(&e.id()) else {
                        error!("未知批次的任务执行失败: {}", e);
                        continue;
                    };
                    error!("{} 任务执行失败: {}", job, e);
                    BatchResult::failed(job, 0)
                }
            };

            log_batch_complete(results.len() + 1, total, &result);
            results.push(result);
        }

        info!("所有批次已结束: {}/{}", results.len(), total);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_jobs_covers_total() {
        for total in 1..=50 {
            for batch_size in 1..=12 {
                let jobs = plan_jobs(total, batch_size);
                let sum: usize = jobs.iter().map(|j| j.requested_count).sum();

                assert_eq!(sum, total, "total={} batch_size={}", total, batch_size);
                assert_eq!(jobs.len(), total.div_ceil(batch_size));
                assert!(jobs.iter().all(|j| j.requested_count > 0 && j.requested_count <= batch_size));
                assert!(jobs.iter().enumerate().all(|(i, j)| j.batch_index == i));
            }
        }
    }

    #[test]
    fn test_plan_jobs_last_batch_smaller() {
        let jobs = plan_jobs(10, 3);
        let counts: Vec<usize> = jobs.iter().map(|j| j.requested_count).collect();
        assert_eq!(counts, vec![3, 3, 3, 1]);
    }

    #[test]
    fn test_plan_jobs_zero() {
        assert!(plan_jobs(0, 5).is_empty());
        assert!(plan_jobs(5, 0).is_empty());
    }
}
