//! 核心数据模型定义
//!
//! 检查器的输入是按顺序排列的规则字符串，输出都是可序列化的结构化结果，
//! 每次检查都从输入重新构建，不在调用之间保留任何状态。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 规则语法
/// 描述 "If <条件>, then <结果>" 中的字面连接词
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSyntax {
    /// 规则前缀（包含尾随空格），如 "If "
    pub prefix: String,
    /// 条件与结果之间的分隔符，如 ", then "
    pub separator: String,
}

impl RuleSyntax {
    /// 英文语法: "If <条件>, then <结果>"
    pub fn english() -> Self {
        Self {
            prefix: "If ".to_string(),
            separator: ", then ".to_string(),
        }
    }

    /// 俄文语法: "Если <条件>, то <结果>"
    pub fn russian() -> Self {
        Self {
            prefix: "Если ".to_string(),
            separator: ", то ".to_string(),
        }
    }
}

impl Default for RuleSyntax {
    fn default() -> Self {
        Self::english()
    }
}

/// 解析后的规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRule {
    /// 条件（前件）
    pub condition: String,
    /// 结果（后件）
    pub result: String,
}

/// 矛盾记录
/// 同一条件被映射到了不同的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    /// 引入新结果的规则原文
    pub rule: String,
    /// 冲突的条件
    pub condition: String,
    /// 新引入的结果
    pub result: String,
    /// 该条件此前已记录的其他结果
    pub conflicts_with: Vec<String>,
}

impl Contradiction {
    /// 人类可读的描述
    pub fn message(&self) -> String {
        format!("矛盾: '{}' 与条件 '{}' 的已有结果冲突", self.rule, self.condition)
    }
}

/// 条件矩阵
/// cells[i][j] == 1 表示条件 i 的结果列表中字面包含条件 j
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionMatrix {
    /// 行/列标签（条件，按首次出现顺序）
    pub labels: Vec<String>,
    /// N×N 单元格
    pub cells: Vec<Vec<u8>>,
}

impl ConditionMatrix {
    /// 矩阵维度
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 读取单元格，越界返回 None
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }
}

/// 冗余规则记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedundantRule {
    /// 规则在列表中的位置（从0开始）
    pub index: usize,
    /// 规则原文
    pub rule: String,
    /// 重复的条件
    pub condition: String,
    /// 该条件首次出现的位置
    pub first_index: usize,
}

/// 条件出现次数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionCount {
    pub condition: String,
    pub count: usize,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 规则文件路径
    pub rules_file: PathBuf,
    /// 认知模型文件路径
    pub model_file: PathBuf,
    /// 规则语法
    #[serde(default)]
    pub syntax: RuleSyntax,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules_file: PathBuf::from("input.txt"),
            model_file: PathBuf::from("model.json"),
            syntax: RuleSyntax::default(),
        }
    }
}
