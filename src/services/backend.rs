//! 生成后端接口
//!
//! 后端对核心流程来说是黑盒：输入提示词，输出文本或错误。
//! 重试由调用方负责，后端实现不应自行重试。

use async_trait::async_trait;

use crate::error::AppResult;

/// 一次生成请求
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// 所属批次索引，仅用于日志和测试替身
    pub batch_index: usize,
    /// 第几次尝试（从0开始）
    pub attempt: u32,
    pub prompt: &'a str,
}

/// 文本生成后端
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// 发送一次请求，返回原始响应文本
    async fn generate(&self, request: GenerationRequest<'_>) -> AppResult<String>;
}
