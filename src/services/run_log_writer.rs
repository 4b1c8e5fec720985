//! 运行日志写入服务 - 业务能力层
//!
//! 只负责"追加一行运行记录"能力，不关心流程

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::RunReport;

/// 运行日志写入服务
///
/// 职责：
/// - 每次运行向日志文件追加一行
/// - 从不覆盖已有内容
pub struct RunLogWriter {
    log_file_path: String,
}

impl RunLogWriter {
    /// 创建写入指定文件的运行日志服务
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            log_file_path: path.into(),
        }
    }

    /// 追加一行运行记录
    ///
    /// # 参数
    /// - `report`: 运行统计
    /// - `batch_size`: 批大小
    /// - `concurrency`: 并发数
    pub async fn append(
        &self,
        report: &RunReport,
        batch_size: usize,
        concurrency: usize,
    ) -> AppResult<()> {
        let line = format!(
            "[{}] {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            report.to_log_line(batch_size, concurrency)
        );

        debug!("写入运行日志: {}", self.log_file_path);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .await
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;
        file.flush()
            .await
            .map_err(|e| AppError::file_write_failed(&self.log_file_path, e))?;

        Ok(())
    }
}
