//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{BatchResult, RunReport};

/// 初始化 tracing 日志
///
/// 日志级别取自 `RUST_LOG`，未设置时为 info；重复调用不会报错
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config, batches_total: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量商品生成模式");
    info!("🤖 模型: {} @ {}", config.llm_model_name, config.llm_api_base_url);
    info!(
        "📊 目标数量: {} | 批大小: {} | 最大并发数: {} | 重试次数: {}",
        config.total_items, config.batch_size, config.max_concurrent_requests, config.max_retries
    );
    info!("📦 批次总数: {}", batches_total);
    info!("{}", "=".repeat(60));
}

/// 记录单个批次结束
///
/// # 参数
/// - `done`: 已结束的批次数量
/// - `total`: 批次总数
/// - `result`: 刚结束的批次结果
pub fn log_batch_complete(done: usize, total: usize, result: &BatchResult) {
    if result.succeeded {
        info!(
            "📈 进度 {}/{} | {} 完成 (尝试 {} 次)",
            done, total, result.job, result.attempts
        );
    } else {
        warn!(
            "📈 进度 {}/{} | {} 失败 (尝试 {} 次)",
            done, total, result.job, result.attempts
        );
    }
}

/// 打印最终统计信息
pub fn print_final_stats(report: &RunReport, output_path: &str, run_log_path: &str) {
    let secs = report.duration.as_secs_f64();
    info!("\n{}", "=".repeat(60));
    info!("📊 全部生成完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!(
        "🎯 目标: {} | 实际生成: {}",
        report.total_requested, report.total_generated
    );
    info!(
        "✅ 成功批次: {}/{}",
        report.batches_succeeded, report.batches_total
    );
    info!("❌ 失败批次: {}", report.batches_failed);
    if report.duplicate_ids > 0 {
        info!("🔁 重复 id: {}", report.duplicate_ids);
    }
    info!("⏱️ 总耗时: {:.2} 秒 ({:.2} 分钟)", secs, secs / 60.0);
    info!("{}", "=".repeat(60));
    info!("\n输出文件: {}", output_path);
    info!("运行日志: {}", run_log_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
        // 按字符而不是字节截断
        assert_eq!(truncate_text("生成商品数据", 2), "生成...");
    }
}
