//! 结果汇总 - 编排层
//!
//! 所有批次结束后一次性合并，不做流式合并

use std::collections::HashSet;
use std::time::Duration;

use tracing::warn;

use crate::models::{BatchResult, Record, RunReport};

/// 汇总后的生成结果
#[derive(Debug, Clone)]
pub struct CatalogOutcome {
    pub records: Vec<Record>,
    pub report: RunReport,
}

/// 结果汇总器
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    /// 是否丢弃跨批次重复的 id（保留第一次出现的记录）
    dedupe_ids: bool,
}

impl Aggregator {
    pub fn new(dedupe_ids: bool) -> Self {
        Self { dedupe_ids }
    }

    /// 合并所有批次结果
    ///
    /// 记录按结果到达的顺序拼接，不按批次索引重排
    pub fn aggregate(
        &self,
        results: Vec<BatchResult>,
        total_requested: usize,
        duration: Duration,
    ) -> CatalogOutcome {
        let batches_total = results.len();
        let mut batches_succeeded = 0;
        let mut records = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut duplicate_ids = 0;

        for result in results {
            if !result.succeeded {
                continue;
            }
            batches_succeeded += 1;

            for record in result.records {
                let is_duplicate = match record.get("id").and_then(|v| v.as_str()) {
                    Some(id) => !seen_ids.insert(id.to_string()),
                    None => false,
                };

                if is_duplicate {
                    duplicate_ids += 1;
                    if self.dedupe_ids {
                        continue;
                    }
                }
                records.push(record);
            }
        }

        if duplicate_ids > 0 {
            warn!(
                "⚠️ 发现 {} 条重复 id 的记录{}",
                duplicate_ids,
                if self.dedupe_ids { "，已丢弃" } else { "" }
            );
        }

        let report = RunReport {
            total_requested,
            total_generated: records.len(),
            batches_total,
            batches_succeeded,
            batches_failed: batches_total - batches_succeeded,
            duplicate_ids,
            duration,
        };

        CatalogOutcome { records, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationJob;
    use serde_json::json;

    fn ok(batch_index: usize, ids: &[&str]) -> BatchResult {
        let records = ids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>();
        BatchResult::success(GenerationJob::new(batch_index, ids.len()), records, 1)
    }

    fn failed(batch_index: usize, count: usize) -> BatchResult {
        BatchResult::failed(GenerationJob::new(batch_index, count), 3)
    }

    #[test]
    fn test_aggregate_counts() {
        let results = vec![
            ok(2, &["e", "f"]),
            failed(0, 2),
            ok(1, &["c", "d"]),
            ok(3, &["g", "h"]),
            ok(4, &["i", "j"]),
        ];

        let outcome = Aggregator::default().aggregate(results, 10, Duration::from_secs(1));

        assert_eq!(outcome.records.len(), 8);
        assert_eq!(outcome.report.total_requested, 10);
        assert_eq!(outcome.report.total_generated, 8);
        assert_eq!(outcome.report.batches_total, 5);
        assert_eq!(outcome.report.batches_succeeded, 4);
        assert_eq!(outcome.report.batches_failed, 1);
        // 完成顺序
        assert_eq!(outcome.records[0]["id"], "e");
    }

    #[test]
    fn test_duplicates_counted_but_kept_by_default() {
        let results = vec![ok(0, &["a", "b"]), ok(1, &["b", "c"])];

        let outcome = Aggregator::default().aggregate(results, 4, Duration::ZERO);

        assert_eq!(outcome.records.len(), 4);
        assert_eq!(outcome.report.duplicate_ids, 1);
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let results = vec![ok(0, &["a", "b"]), ok(1, &["b", "c"])];

        let outcome = Aggregator::new(true).aggregate(results, 4, Duration::ZERO);

        let ids: Vec<&str> = outcome
            .records
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(outcome.report.total_generated, 3);
        assert_eq!(outcome.report.duplicate_ids, 1);
    }

    #[test]
    fn test_all_failed() {
        let outcome =
            Aggregator::default().aggregate(vec![failed(0, 2), failed(1, 2)], 4, Duration::ZERO);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.report.batches_failed, 2);
        assert_eq!(outcome.report.success_ratio(), 0.0);
    }
}
