//! 矛盾检查模块
//!
//! 按顺序记录每个条件出现过的不同结果。当某条规则为已有其他结果的条件
//! 引入新结果时，记录一条矛盾。同时生成条件之间的邻接矩阵。

use crate::core::models::{ConditionMatrix, Contradiction};
use crate::core::parser::RuleParser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 矛盾检查结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// 矛盾列表（按规则顺序）
    pub contradictions: Vec<Contradiction>,
    /// 条件矩阵
    pub matrix: ConditionMatrix,
}

impl ConsistencyReport {
    /// 条件列表（即矩阵标签）
    pub fn conditions(&self) -> &[String] {
        &self.matrix.labels
    }

    /// 矛盾描述
    pub fn messages(&self) -> Vec<String> {
        self.contradictions.iter().map(Contradiction::message).collect()
    }
}

/// 矛盾检查器
#[derive(Debug, Clone, Default)]
pub struct ConsistencyChecker {
    parser: RuleParser,
}

impl ConsistencyChecker {
    pub fn new(parser: RuleParser) -> Self {
        Self { parser }
    }

    /// 执行检查
    pub fn check<S: AsRef<str>>(&self, rules: &[S]) -> ConsistencyReport {
        let mut contradictions = Vec::new();
        // 条件 -> 已记录的不同结果；conditions 保存首次出现顺序
        let mut index: HashMap<String, Vec<String>> = HashMap::new();
        let mut conditions: Vec<String> = Vec::new();

        for (rule, parsed) in self.parser.parse_all(rules) {
            let results = index.entry(parsed.condition.clone()).or_insert_with(|| {
                conditions.push(parsed.condition.clone());
                Vec::new()
            });

            if results.contains(&parsed.result) {
                continue;
            }

            if !results.is_empty() {
                contradictions.push(Contradiction {
                    rule: rule.to_string(),
                    condition: parsed.condition.clone(),
                    result: parsed.result.clone(),
                    conflicts_with: results.clone(),
                });
            }
            results.push(parsed.result);
        }

        let cells = conditions
            .iter()
            .enumerate()
            .map(|(i, condition)| {
                let results = index.get(condition);
                conditions
                    .iter()
                    .enumerate()
                    .map(|(j, other)| {
                        let linked = i != j && results.is_some_and(|r| r.contains(other));
                        u8::from(linked)
                    })
                    .collect()
            })
            .collect();

        tracing::debug!(
            "矛盾检查完成: {} 个条件, {} 处矛盾",
            conditions.len(),
            contradictions.len()
        );

        ConsistencyReport {
            contradictions,
            matrix: ConditionMatrix {
                labels: conditions,
                cells,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(rules: &[&str]) -> ConsistencyReport {
        ConsistencyChecker::default().check(rules)
    }

    #[test]
    fn test_contradiction_names_condition() {
        let report = check(&["If rain, then wet", "If rain, then flood"]);

        assert_eq!(report.contradictions.len(), 1);
        let c = &report.contradictions[0];
        assert_eq!(c.condition, "rain");
        assert_eq!(c.rule, "If rain, then flood");
        assert_eq!(c.conflicts_with, vec!["wet".to_string()]);
        assert!(c.message().contains("rain"));

        assert_eq!(report.conditions(), &["rain".to_string()]);
        assert_eq!(report.matrix.cells, vec![vec![0]]);
    }

    #[test]
    fn test_duplicate_result_is_noop() {
        let report = check(&["If A, then B", "If A, then B"]);
        assert!(report.contradictions.is_empty());
        assert_eq!(report.matrix.size(), 1);
    }

    #[test]
    fn test_each_new_result_reported_once() {
        let report = check(&[
            "If A, then B",
            "If X, then Y",
            "If A, then C",
            "If A, then B",
            "If A, then D",
        ]);

        let rules: Vec<_> = report.contradictions.iter().map(|c| c.rule.as_str()).collect();
        assert_eq!(rules, vec!["If A, then C", "If A, then D"]);
        assert_eq!(
            report.contradictions[1].conflicts_with,
            vec!["B".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn test_matrix_links_conditions_through_results() {
        let report = check(&["If A, then B", "If B, then C", "If C, then A", "If A, then A"]);

        assert_eq!(report.conditions(), &["A", "B", "C"].map(String::from));
        // A -> B，A -> A 为对角线，不计入
        assert_eq!(report.matrix.cells[0], vec![0, 1, 0]);
        assert_eq!(report.matrix.cells[1], vec![0, 0, 1]);
        assert_eq!(report.matrix.cells[2], vec![1, 0, 0]);
        assert_eq!(report.matrix.get(3, 0), None);
    }

    #[test]
    fn test_malformed_and_empty_input() {
        let report = check(&[]);
        assert!(report.contradictions.is_empty());
        assert!(report.matrix.is_empty());

        let report = check(&["Random text", "If only"]);
        assert!(report.contradictions.is_empty());
        assert!(report.matrix.is_empty());
    }
}
