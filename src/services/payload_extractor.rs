//! JSON 列表提取 - 业务能力层
//!
//! 从 LLM 的自由文本响应中找出 JSON 列表。只做启发式查找，不做括号配对：
//! 列表前后的说明文字可以容忍，代价是偶尔会把外层括号内的多余内容一起带上。

use std::sync::LazyLock;

use regex::Regex;

/// 第一个 `[` 到最后一个 `]`（跨行）
static LIST_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("列表匹配正则无效"));

/// 代码块围栏
const FENCE: &str = "```";

/// 从响应文本中提取 JSON 列表
///
/// 按以下顺序尝试：
/// 1. 贪婪匹配 `[ ... ]`，且包含至少一对 `{` `}`
/// 2. 去掉首尾的代码块围栏（可带语言标记）后再检查
///
/// 都失败时返回 None
pub fn extract_json_list(text: &str) -> Option<String> {
    let trimmed = text.trim();

    if let Some(found) = LIST_SPAN.find(trimmed) {
        let candidate = found.as_str();
        if looks_like_object_list(candidate) {
            return Some(candidate.to_string());
        }
    }

    let unfenced = strip_code_fence(trimmed);
    if looks_like_object_list(unfenced) {
        return Some(unfenced.to_string());
    }

    None
}

/// 去掉首尾的 ``` 围栏；首行围栏后的语言标记（如 json）一并去掉
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };

    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let rest = rest.strip_suffix(FENCE).unwrap_or(rest);
    rest.trim()
}

fn looks_like_object_list(candidate: &str) -> bool {
    candidate.starts_with('[')
        && candidate.ends_with(']')
        && candidate.contains('{')
        && candidate.contains('}')
}
