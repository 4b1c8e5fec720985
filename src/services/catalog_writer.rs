//! 输出文件写入服务 - 业务能力层
//!
//! 只负责"把合并后的记录写成一个 JSON 文件"能力

use std::path::PathBuf;

use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::Record;

/// 输出文件写入服务
pub struct CatalogWriter {
    output_path: PathBuf,
}

impl CatalogWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// 写入全部记录（格式化 JSON 列表）
    ///
    /// 先写临时文件再重命名，读者不会看到写了一半的文件
    ///
    /// # 返回
    /// 返回写入的字节数
    pub async fn write(&self, records: &[Record]) -> AppResult<u64> {
        let path_str = self.output_path.display().to_string();
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| AppError::file_write_failed(&path_str, e))?;

        let tmp_path = self.tmp_path();
        debug!("写入临时文件: {}", tmp_path.display());

        tokio::fs::write(&tmp_path, &json)
            .await
            .map_err(|e| AppError::file_write_failed(tmp_path.display().to_string(), e))?;
        tokio::fs::rename(&tmp_path, &self.output_path)
            .await
            .map_err(|e| AppError::file_write_failed(&path_str, e))?;

        Ok(json.len() as u64)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .output_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.output_path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_write_records() {
        let path = std::env::temp_dir().join(format!("catalog_{}.json", std::process::id()));
        let writer = CatalogWriter::new(&path);
        let records = vec![json!({"id": "FMCG-1"}), json!({"id": "FMCG-2"})];

        let bytes = writer.write(&records).await.unwrap();
        assert!(bytes > 0);

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: Vec<Record> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, records);
        assert!(!writer.tmp_path().exists());

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_write_to_missing_dir_fails() {
        let writer = CatalogWriter::new("/nonexistent-dir/catalog.json");
        let result = writer.write(&[json!({"id": "x"})]).await;
        assert!(matches!(result, Err(AppError::File(_))));
    }
}
