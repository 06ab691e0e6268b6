//! 规则解析模块
//!
//! 从 "If <条件>, then <结果>" 形式的字符串中提取条件与结果。
//! 条件取到第一个可用分隔符为止（最短匹配），结果取剩余部分。
//! 不符合格式的字符串返回 None，由下游检查器静默跳过。

use crate::core::models::{ParsedRule, RuleSyntax};

/// 规则解析器
#[derive(Debug, Clone, Default)]
pub struct RuleParser {
    syntax: RuleSyntax,
}

impl RuleParser {
    /// 使用指定语法创建解析器
    pub fn new(syntax: RuleSyntax) -> Self {
        Self { syntax }
    }

    /// 解析单条规则
    pub fn parse(&self, rule: &str) -> Option<ParsedRule> {
        let rest = rule.strip_prefix(self.syntax.prefix.as_str())?;
        let separator = self.syntax.separator.as_str();
        if separator.is_empty() {
            return None;
        }

        for (idx, _) in rest.match_indices(separator) {
            // 条件至少一个字符
            if idx == 0 {
                continue;
            }

            let condition = &rest[..idx];
            // 条件不能跨行，之后的分隔符同样跨行
            if condition.contains('\n') {
                return None;
            }

            let tail = &rest[idx + separator.len()..];
            let result = tail.split('\n').next().unwrap_or("");
            if result.is_empty() {
                continue;
            }

            return Some(ParsedRule {
                condition: condition.trim().to_string(),
                result: result.trim().to_string(),
            });
        }

        None
    }

    /// 批量解析，跳过格式不符的规则，保留原文
    pub fn parse_all<'a, S: AsRef<str>>(&self, rules: &'a [S]) -> Vec<(&'a str, ParsedRule)> {
        rules
            .iter()
            .filter_map(|rule| {
                let rule = rule.as_ref();
                self.parse(rule).map(|parsed| (rule, parsed))
            })
            .collect()
    }
}
