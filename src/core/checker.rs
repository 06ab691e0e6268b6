//! 规则检查引擎
//!
//! 对同一组规则依次执行矛盾、冗余和循环检查，并把结果汇总成报告。
//! 引擎本身不保存状态，每次检查都重新解析规则。

use crate::core::consistency::{ConsistencyChecker, ConsistencyReport};
use crate::core::cycles::{CycleDetector, CycleReport};
use crate::core::models::{ConditionMatrix, RuleSyntax};
use crate::core::parser::RuleParser;
use crate::core::redundancy::{RedundancyChecker, RedundancyReport};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 综合检查报告
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// 检查时间
    pub checked_at: DateTime<Utc>,
    /// 规则总数（包括格式不符的规则）
    pub total_rules: usize,
    /// 格式正确的规则数
    pub parsed_rules: usize,
    pub consistency: ConsistencyReport,
    pub redundancy: RedundancyReport,
    pub cycles: CycleReport,
}

impl CheckReport {
    /// 是否没有发现任何问题
    pub fn is_clean(&self) -> bool {
        self.consistency.contradictions.is_empty()
            && self.redundancy.redundant.is_empty()
            && self.cycles.cycles.is_empty()
    }

    /// 渲染为文本报告
    /// 顺序固定：矛盾、矛盾矩阵、冗余、循环
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        out.push_str("矛盾检查:\n");
        if self.consistency.contradictions.is_empty() {
            out.push_str("\n没有矛盾。\n\n");
        } else {
            out.push_str("\n矛盾规则:\n");
            out.push_str(&self.consistency.messages().join("\n"));
            out.push_str("\n\n");
        }

        out.push_str(&render_matrix(&self.consistency.matrix, "矛盾矩阵"));

        out.push_str("冗余检查:\n");
        if self.redundancy.redundant.is_empty() {
            out.push_str("\n没有冗余。\n\n");
        } else {
            out.push_str("\n冗余规则:\n");
            out.push_str(&self.redundancy.rules().join("\n"));
            out.push_str("\n\n");
        }

        out.push_str("循环检查:\n");
        if self.cycles.cycles.is_empty() {
            out.push_str("\n没有循环依赖。\n\n");
        } else {
            out.push_str("\n循环依赖:\n");
            let lines: Vec<String> = self
                .cycles
                .cycles
                .iter()
                .map(|cycle| format!("[{}]", cycle.join(", ")))
                .collect();
            out.push_str(&lines.join("\n"));
            out.push_str("\n\n");
        }

        out
    }
}

/// 将矩阵渲染为制表符分隔的文本
pub fn render_matrix(matrix: &ConditionMatrix, title: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}:\n", title));
    out.push_str(&format!("\t{}\n", matrix.labels.join("\t")));
    for (label, row) in matrix.labels.iter().zip(&matrix.cells) {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        out.push_str(&format!("{}\t{}\n", label, cells.join("\t")));
    }
    out.push('\n');
    out
}

/// 规则检查引擎
#[derive(Debug, Clone, Default)]
pub struct RuleChecker {
    parser: RuleParser,
}

impl RuleChecker {
    /// 使用指定语法创建检查引擎
    pub fn new(syntax: RuleSyntax) -> Self {
        Self {
            parser: RuleParser::new(syntax),
        }
    }

    pub fn parser(&self) -> &RuleParser {
        &self.parser
    }

    /// 矛盾检查
    pub fn check_contradictions<S: AsRef<str>>(&self, rules: &[S]) -> ConsistencyReport {
        ConsistencyChecker::new(self.parser.clone()).check(rules)
    }

    /// 冗余检查
    pub fn check_redundancy<S: AsRef<str>>(&self, rules: &[S]) -> RedundancyReport {
        RedundancyChecker::new(self.parser.clone()).check(rules)
    }

    /// 循环依赖检查
    pub fn check_cycles<S: AsRef<str>>(&self, rules: &[S]) -> CycleReport {
        CycleDetector::new(self.parser.clone()).check(rules)
    }

    /// 执行所有检查
    pub fn check_all<S: AsRef<str>>(&self, rules: &[S]) -> CheckReport {
        let parsed_rules = self.parser.parse_all(rules).len();
        let report = CheckReport {
            checked_at: Utc::now(),
            total_rules: rules.len(),
            parsed_rules,
            consistency: self.check_contradictions(rules),
            redundancy: self.check_redundancy(rules),
            cycles: self.check_cycles(rules),
        };

        tracing::info!(
            "检查完成: {}/{} 条规则有效, {} 处矛盾, {} 条冗余, {} 个循环",
            report.parsed_rules,
            report.total_rules,
            report.consistency.contradictions.len(),
            report.redundancy.redundant.len(),
            report.cycles.cycles.len()
        );

        report
    }
}
