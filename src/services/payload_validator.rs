//! 结构校验 - 业务能力层

use serde::Deserialize;
use serde_json::Value;

use crate::models::{Product, Record};

/// 校验结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub ok: bool,
    pub reason: Option<String>,
}

impl ValidationOutcome {
    fn pass() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

/// 校验解析后的 JSON：必须是列表，且长度等于请求数量
pub fn validate_payload(value: &Value, requested_count: usize) -> ValidationOutcome {
    match value {
        Value::Array(items) if items.len() == requested_count => ValidationOutcome::pass(),
        Value::Array(items) => ValidationOutcome::fail(format!(
            "期望 {} 条记录，实际得到 {} 条",
            requested_count,
            items.len()
        )),
        other => ValidationOutcome::fail(format!(
            "期望 {} 条记录的列表，实际得到 {}",
            requested_count,
            json_type_name(other)
        )),
    }
}

/// 字段级校验：每条记录都必须符合 `Product` 结构
pub fn validate_records_schema(records: &[Record]) -> ValidationOutcome {
    for (idx, record) in records.iter().enumerate() {
        if let Err(e) = Product::deserialize(record) {
            return ValidationOutcome::fail(format!("第 {} 条记录不符合商品结构: {}", idx, e));
        }
    }
    ValidationOutcome::pass()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "布尔值",
        Value::Number(_) => "数字",
        Value::String(_) => "字符串",
        Value::Array(_) => "列表",
        Value::Object(_) => "对象",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_exact_count() {
        let value = json!([{"id": "a"}, {"id": "b"}]);
        let outcome = validate_payload(&value, 2);
        assert!(outcome.ok);
        assert!(outcome.reason.is_none());
    }

    #[test]
    fn test_rejects_wrong_count() {
        let value = json!([{"id": "a"}]);
        for requested in [2, 3, 10] {
            let outcome = validate_payload(&value, requested);
            assert!(!outcome.ok);
            assert_eq!(
                outcome.reason.as_deref(),
                Some(format!("期望 {} 条记录，实际得到 1 条", requested).as_str())
            );
        }
    }

    #[test]
    fn test_rejects_non_list() {
        for requested in [1, 2, 5] {
            let outcome = validate_payload(&json!({"id": "a"}), requested);
            assert!(!outcome.ok);
            assert!(outcome.reason.unwrap().contains("对象"));
        }
        assert!(!validate_payload(&json!("text"), 1).ok);
        assert!(!validate_payload(&json!(null), 1).ok);
    }

    #[test]
    fn test_schema_check() {
        let good = json!({
            "id": "FMCG-0001",
            "title": "Oat Crunch",
            "description": "Whole grain oat clusters.",
            "category": "Snacks",
            "brand": "Morning Co",
            "price": 4.5,
            "tags": ["whole grain"]
        });
        let bad = json!({"id": "FMCG-0002", "title": "Missing fields"});

        assert!(validate_records_schema(&[good.clone()]).ok);

        let outcome = validate_records_schema(&[good, bad]);
        assert!(!outcome.ok);
        assert!(outcome.reason.unwrap().starts_with("第 1 条记录"));
    }
}
