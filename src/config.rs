use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::info;

use crate::error::{AppError, AppResult, ConfigError, FileError};

/// 默认配置文件
const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

/// 程序配置文件
///
/// 整个运行期间保持不变，由 `App` 持有并向下传递
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 需要生成的商品总数
    pub total_items: usize,
    /// 每次请求生成的商品数量
    pub batch_size: usize,
    /// 同时进行的请求数量
    pub max_concurrent_requests: usize,
    /// 每个批次在首次尝试之外的重试次数
    pub max_retries: u32,
    /// 两次尝试之间的固定等待时间（毫秒）
    pub retry_delay_ms: u64,
    /// 单次尝试的超时时间（秒），None 或 0 表示不限制
    pub attempt_timeout_secs: Option<u64>,
    /// 输出文件，None 时按商品总数命名
    pub output_file: Option<String>,
    /// 运行日志文件（只追加）
    pub run_log_file: String,
    /// 是否按 id 去重
    pub dedupe_ids: bool,
    /// 是否对每条记录做字段级校验
    pub strict_schema: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total_items: 10,
            batch_size: 2,
            max_concurrent_requests: 3,
            max_retries: 2,
            retry_delay_ms: 5_000,
            attempt_timeout_secs: None,
            output_file: None,
            run_log_file: "log.txt".to_string(),
            dedupe_ids: false,
            strict_schema: false,
            llm_api_key: String::new(),
            llm_api_base_url: "http://localhost:11434/v1".to_string(),
            llm_model_name: "llama3.2".to_string(),
            llm_temperature: 0.2,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（可选）→ 环境变量 → 校验
    ///
    /// TOML 文件路径取自 `CATALOG_CONFIG`，未设置时尝试当前目录下的 `catalog.toml`
    pub fn load() -> AppResult<Self> {
        let explicit = std::env::var("CATALOG_CONFIG").ok();
        let path = explicit.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);

        let base = if explicit.is_some() || Path::new(path).exists() {
            info!("📄 读取配置文件: {}", path);
            Self::from_toml_file(path)?
        } else {
            Self::default()
        };

        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取，缺失的字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AppError::File(FileError::TomlParseFailed { source, .. }) => {
                AppError::File(FileError::TomlParseFailed {
                    path: path.display().to_string(),
                    source,
                })
            }
            other => other,
        })
    }

    /// 解析 TOML 文本
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| {
            AppError::File(FileError::TomlParseFailed {
                path: String::new(),
                source: Box::new(e),
            })
        })
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> AppResult<Self> {
        Ok(Self {
            total_items: env_parse("TOTAL_ITEMS")?.unwrap_or(self.total_items),
            batch_size: env_parse("BATCH_SIZE")?.unwrap_or(self.batch_size),
            max_concurrent_requests: env_parse("MAX_CONCURRENT_REQUESTS")?
                .unwrap_or(self.max_concurrent_requests),
            max_retries: env_parse("MAX_RETRIES")?.unwrap_or(self.max_retries),
            retry_delay_ms: env_parse("RETRY_DELAY_MS")?.unwrap_or(self.retry_delay_ms),
            attempt_timeout_secs: env_parse("ATTEMPT_TIMEOUT_SECS")?.or(self.attempt_timeout_secs),
            output_file: std::env::var("OUTPUT_FILE").ok().or(self.output_file),
            run_log_file: std::env::var("RUN_LOG_FILE").unwrap_or(self.run_log_file),
            dedupe_ids: env_parse("DEDUPE_IDS")?.unwrap_or(self.dedupe_ids),
            strict_schema: env_parse("STRICT_SCHEMA")?.unwrap_or(self.strict_schema),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            llm_temperature: env_parse("LLM_TEMPERATURE")?.unwrap_or(self.llm_temperature),
        })
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        if self.total_items == 0 {
            return Err(AppError::invalid_config("total_items", "必须大于 0"));
        }
        if self.batch_size == 0 {
            return Err(AppError::invalid_config("batch_size", "必须大于 0"));
        }
        if self.max_concurrent_requests == 0 {
            return Err(AppError::invalid_config(
                "max_concurrent_requests",
                "必须大于 0",
            ));
        }
        if self.max_concurrent_requests > Semaphore::MAX_PERMITS {
            return Err(AppError::invalid_config(
                "max_concurrent_requests",
                format!("不能超过 {}", Semaphore::MAX_PERMITS),
            ));
        }
        if self.max_retries == u32::MAX {
            return Err(AppError::invalid_config(
                "max_retries",
                format!("必须小于 {}", u32::MAX),
            ));
        }
        Ok(())
    }

    /// 输出文件路径
    pub fn output_path(&self) -> String {
        self.output_file
            .clone()
            .unwrap_or_else(|| format!("fmcg_data_{}.json", self.total_items))
    }

    /// 重试间隔
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// 单次尝试超时
    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// 读取并解析环境变量；未设置时返回 None，格式错误时报错
fn env_parse<T: std::str::FromStr>(var_name: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::Config(ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            })
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_path(), "fmcg_data_10.json");
        assert_eq!(config.retry_delay(), Duration::from_secs(5));
        assert!(config.attempt_timeout().is_none());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let config = Config {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_concurrent_requests: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            total_items: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_str_partial() {
        let config = Config::from_toml_str(
            r#"
total_items = 500
batch_size = 5
attempt_timeout_secs = 30
output_file = "catalog.json"
"#,
        )
        .unwrap();

        assert_eq!(config.total_items, 500);
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.attempt_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.output_path(), "catalog.json");
        // 未填写的字段保持默认
        assert_eq!(config.max_concurrent_requests, 3);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.llm_model_name, "llama3.2");
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let config = Config {
            max_retries: u32::MAX,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_concurrent_requests: Semaphore::MAX_PERMITS + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_retries: u32::MAX - 1,
            max_concurrent_requests: 64,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_means_unlimited() {
        let config = Config::from_toml_str("attempt_timeout_secs = 0").unwrap();
        assert_eq!(config.attempt_timeout(), None);

        let config = Config {
            attempt_timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(config.attempt_timeout(), None);
    }

    #[test]
    fn test_from_toml_str_rejects_bad_type() {
        let result = Config::from_toml_str("batch_size = \"two\"");
        assert!(matches!(
            result,
            Err(AppError::File(FileError::TomlParseFailed { .. }))
        ));
    }
}
