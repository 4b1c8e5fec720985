//! 批次生成流程 - 流程层
//!
//! 核心职责：定义"一个批次"的完整处理流程
//!
//! 流程顺序（每次尝试）：
//! 1. 调用后端 → 2. 提取 JSON 列表 → 3. 解析 → 4. 校验
//!
//! 任一步失败都算一次失败的尝试；还有剩余次数时固定等待后重试，
//! 次数用尽时返回空的失败结果。任何错误都不会传到调度层。

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::AttemptError;
use crate::models::{BatchResult, GenerationJob, Record};
use crate::services::{
    build_generation_prompt, extract_json_list, validate_payload, validate_records_schema,
    GenerationBackend, GenerationRequest,
};
use crate::utils::logging::truncate_text;

/// 日志中保留的原始响应长度
const SNIPPET_LEN: usize = 200;

/// 重试策略：固定间隔，不做指数退避
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 首次尝试之外的重试次数
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// 单次尝试的超时，None 表示交给后端自己处理
    pub attempt_timeout: Option<Duration>,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
            attempt_timeout: config.attempt_timeout(),
        }
    }

    /// 最大尝试次数（含首次）
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// 批次生成流程
///
/// - 只处理单个批次
/// - 不持有并发许可，由调度层控制
/// - 只依赖后端能力（services）
pub struct BatchWorker {
    backend: Arc<dyn GenerationBackend>,
    policy: RetryPolicy,
    strict_schema: bool,
}

impl BatchWorker {
    pub fn new(backend: Arc<dyn GenerationBackend>, policy: RetryPolicy) -> Self {
        Self {
            backend,
            policy,
            strict_schema: false,
        }
    }

    /// 开启字段级校验
    pub fn with_strict_schema(mut self, strict: bool) -> Self {
        self.strict_schema = strict;
        self
    }

    pub fn from_config(backend: Arc<dyn GenerationBackend>, config: &Config) -> Self {
        Self::new(backend, RetryPolicy::from_config(config)).with_strict_schema(config.strict_schema)
    }

    /// 执行一个批次，直到成功或次数用尽
    pub async fn run(&self, job: GenerationJob) -> BatchResult {
        let prompt = build_generation_prompt(job.requested_count);
        let max_attempts = self.policy.max_attempts();

        for attempt in 0..max_attempts {
            match self.attempt_once(&job, &prompt, attempt).await {
                Ok(records) => {
                    info!(
                        "{} ✓ 第 {}/{} 次尝试成功，获得 {} 条记录",
                        job,
                        attempt + 1,
                        max_attempts,
                        records.len()
                    );
                    return BatchResult::success(job, records, attempt + 1);
                }
                Err(e) => {
                    warn!(
                        "{} ⚠️ 第 {}/{} 次尝试失败 ({}): {}",
                        job,
                        attempt + 1,
                        max_attempts,
                        e.kind(),
                        e
                    );
                }
            }

            if attempt + 1 < max_attempts {
                info!("{} {:?} 后重试...", job, self.policy.retry_delay);
                tokio::time::sleep(self.policy.retry_delay).await;
            }
        }

        error!("{} ❌ 已尝试 {} 次，全部失败", job, max_attempts);
        BatchResult::failed(job, max_attempts)
    }

    /// 单次尝试：请求 → 提取 → 解析 → 校验
    async fn attempt_once(
        &self,
        job: &GenerationJob,
        prompt: &str,
        attempt: u32,
    ) -> Result<Vec<Record>, AttemptError> {
        let request = GenerationRequest {
            batch_index: job.batch_index,
            attempt,
            prompt,
        };

        let raw = match self.policy.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, self.backend.generate(request))
                .await
                .map_err(|_| AttemptError::Timeout(limit))?,
            None => self.backend.generate(request).await,
        }
        .map_err(AttemptError::Backend)?;

        debug!("{} 收到响应，长度 {} 字符", job, raw.len());

        let candidate = extract_json_list(&raw).ok_or_else(|| AttemptError::Extraction {
            snippet: truncate_text(&raw, SNIPPET_LEN),
        })?;

        let value: Value = serde_json::from_str(&candidate).inspect_err(|_| {
            warn!(
                "{} 响应片段: {}",
                job,
                truncate_text(&raw, SNIPPET_LEN)
            );
        })?;

        let outcome = validate_payload(&value, job.requested_count);
        let records = match (outcome.ok, value) {
            (true, Value::Array(items)) => items,
            _ => return Err(AttemptError::Validation(outcome.reason.unwrap_or_default())),
        };

        if self.strict_schema {
            let outcome = validate_records_schema(&records);
            if !outcome.ok {
                return Err(AttemptError::Validation(outcome.reason.unwrap_or_default()));
            }
        }

        Ok(records)
    }
}
