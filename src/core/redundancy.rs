//! 冗余检查模块
//!
//! 条件首次出现的规则为准，之后条件相同的规则都视为冗余。

use crate::core::models::{ConditionCount, RedundantRule};
use crate::core::parser::RuleParser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 冗余检查结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedundancyReport {
    /// 冗余规则（按规则顺序）
    pub redundant: Vec<RedundantRule>,
    /// 每个条件的出现次数（按首次出现顺序，包含首次）
    pub counts: Vec<ConditionCount>,
}

impl RedundancyReport {
    /// 冗余规则原文
    pub fn rules(&self) -> Vec<&str> {
        self.redundant.iter().map(|r| r.rule.as_str()).collect()
    }

    /// 查询条件出现次数，未出现返回0
    pub fn count_of(&self, condition: &str) -> usize {
        self.counts
            .iter()
            .find(|c| c.condition == condition)
            .map_or(0, |c| c.count)
    }
}

/// 冗余检查器
#[derive(Debug, Clone, Default)]
pub struct RedundancyChecker {
    parser: RuleParser,
}

impl RedundancyChecker {
    pub fn new(parser: RuleParser) -> Self {
        Self { parser }
    }

    /// 执行检查
    pub fn check<S: AsRef<str>>(&self, rules: &[S]) -> RedundancyReport {
        let mut redundant = Vec::new();
        let mut counts: Vec<ConditionCount> = Vec::new();
        // 条件 -> counts 中的位置及首次出现的规则位置
        let mut seen: HashMap<String, (usize, usize)> = HashMap::new();

        for (index, rule) in rules.iter().enumerate() {
            let rule = rule.as_ref();
            let Some(parsed) = self.parser.parse(rule) else {
                continue;
            };

            match seen.get(&parsed.condition) {
                Some(&(slot, first_index)) => {
                    counts[slot].count += 1;
                    redundant.push(RedundantRule {
                        index,
                        rule: rule.to_string(),
                        condition: parsed.condition,
                        first_index,
                    });
                }
                None => {
                    seen.insert(parsed.condition.clone(), (counts.len(), index));
                    counts.push(ConditionCount {
                        condition: parsed.condition,
                        count: 1,
                    });
                }
            }
        }

        tracing::debug!("冗余检查完成: {} 条冗余规则", redundant.len());

        RedundancyReport { redundant, counts }
    }
}
