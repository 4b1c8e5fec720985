use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::RunReport;
use crate::orchestrator::{plan_jobs, Aggregator, CatalogOutcome, Scheduler};
use crate::services::{CatalogWriter, GenerationBackend, LlmService, RunLogWriter};
use crate::utils::logging::{log_startup, print_final_stats};
use crate::workflow::BatchWorker;

/// 应用主结构
pub struct App {
    config: Config,
    backend: Arc<dyn GenerationBackend>,
}

impl App {
    /// 初始化应用（使用 LLM 后端）
    pub fn initialize(config: Config) -> AppResult<Self> {
        let backend = Arc::new(LlmService::new(&config));
        Self::with_backend(config, backend)
    }

    /// 使用自定义后端初始化
    pub fn with_backend(config: Config, backend: Arc<dyn GenerationBackend>) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    /// 运行应用主逻辑：生成 → 写输出文件 → 追加运行日志
    ///
    /// 写文件失败只记录错误，不影响已经得到的结果
    pub async fn run(&self) -> AppResult<RunReport> {
        let outcome = self.generate().await;
        let report = outcome.report.clone();

        let output_path = self.config.output_path();
        self.write_catalog(&outcome, &output_path).await;
        self.append_run_log(&report).await;

        print_final_stats(&report, &output_path, &self.config.run_log_file);

        Ok(report)
    }

    /// 生成全部批次并汇总，不写任何文件
    pub async fn generate(&self) -> CatalogOutcome {
        let jobs = plan_jobs(self.config.total_items, self.config.batch_size);
        log_startup(&self.config, jobs.len());

        let worker = BatchWorker::from_config(self.backend.clone(), &self.config);
        let scheduler = Scheduler::new(worker, self.config.max_concurrent_requests);

        let start = Instant::now();
        let results = scheduler.run(jobs).await;
        let duration = start.elapsed();

        Aggregator::new(self.config.dedupe_ids).aggregate(results, self.config.total_items, duration)
    }

    async fn write_catalog(&self, outcome: &CatalogOutcome, output_path: &str) {
        if outcome.records.is_empty() {
            warn!("⚠️ 没有成功生成任何记录，跳过写入 {}", output_path);
            return;
        }

        info!(
            "💾 正在保存 {} 条记录到 {}...",
            outcome.records.len(),
            output_path
        );

        match CatalogWriter::new(output_path).write(&outcome.records).await {
            Ok(bytes) => {
                info!(
                    "✓ 已保存到 {} ({:.2} MB)",
                    output_path,
                    bytes as f64 / (1024.0 * 1024.0)
                );
            }
            Err(e) => error!("❌ 保存输出文件失败: {}", e),
        }
    }

    async fn append_run_log(&self, report: &RunReport) {
        let writer = RunLogWriter::new(&self.config.run_log_file);
        if let Err(e) = writer
            .append(
                report,
                self.config.batch_size,
                self.config.max_concurrent_requests,
            )
            .await
        {
            error!("❌ 写入运行日志失败: {}", e);
        }
    }
}
