//! 规则文件存储模块
//!
//! 规则以纯文本保存，每行一条，UTF-8 编码，没有文件头。
//! 每次编辑都会完整读取并重写整个文件。

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 规则编辑错误
/// 这些错误不会修改规则文件
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("请输入规则")]
    EmptyRule,
    #[error("规则不能包含换行，每行只能保存一条规则")]
    MultiLineRule,
    #[error("请选择要操作的规则（第 {index} 条不存在，共 {len} 条）")]
    IndexOutOfRange { index: usize, len: usize },
}

/// 规则存储
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 加载规则，文件不存在时返回空列表
    pub fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            tracing::debug!("规则文件不存在，视为空规则集: {}", self.path.display());
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let rules: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!("已加载 {} 条规则: {}", rules.len(), self.path.display());
        Ok(rules)
    }

    /// 保存规则
    pub fn save<S: AsRef<str>>(&self, rules: &[S]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut content = String::new();
        for rule in rules {
            content.push_str(rule.as_ref());
            content.push('\n');
        }
        fs::write(&self.path, content)?;

        tracing::debug!("已保存 {} 条规则: {}", rules.len(), self.path.display());
        Ok(())
    }

    /// 添加规则，返回新规则的位置
    pub fn add(&self, rule: &str) -> Result<usize> {
        let rule = validate(rule)?;
        let mut rules = self.load()?;
        rules.push(rule);
        self.save(&rules)?;

        tracing::info!("已添加规则 #{}", rules.len());
        Ok(rules.len() - 1)
    }

    /// 修改指定位置的规则（从0开始），返回旧规则
    pub fn edit(&self, index: usize, rule: &str) -> Result<String> {
        let rule = validate(rule)?;
        let mut rules = self.load()?;
        check_index(index, rules.len())?;

        let old = std::mem::replace(&mut rules[index], rule);
        self.save(&rules)?;

        tracing::info!("已修改规则 #{}", index + 1);
        Ok(old)
    }

    /// 删除指定位置的规则（从0开始），返回被删除的规则
    pub fn delete(&self, index: usize) -> Result<String> {
        let mut rules = self.load()?;
        check_index(index, rules.len())?;

        let removed = rules.remove(index);
        self.save(&rules)?;

        tracing::info!("已删除规则 #{}", index + 1);
        Ok(removed)
    }
}

/// 规则不能为空且只能占一行；保存前去除首尾空白，与加载时一致
fn validate(rule: &str) -> Result<String, StoreError> {
    let rule = rule.trim();
    if rule.is_empty() {
        return Err(StoreError::EmptyRule);
    }
    if rule.contains(['\n', '\r']) {
        return Err(StoreError::MultiLineRule);
    }
    Ok(rule.to_string())
}

fn check_index(index: usize, len: usize) -> Result<(), StoreError> {
    if index >= len {
        return Err(StoreError::IndexOutOfRange { index: index + 1, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("input.txt"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("nested").join("input.txt"));

        let rules = vec![
            "If A, then B".to_string(),
            "Random text".to_string(),
            "Если дождь, то мокро".to_string(),
        ];
        store.save(&rules).unwrap();
        assert_eq!(store.load().unwrap(), rules);
    }

    #[test]
    fn test_load_trims_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "  If A, then B  \r\n\nRandom text\n").unwrap();

        let store = RuleStore::new(path);
        assert_eq!(store.load().unwrap(), vec!["If A, then B", "Random text"]);
    }

    #[test]
    fn test_add_edit_delete() {
        let dir = tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("input.txt"));

        assert_eq!(store.add("If A, then B").unwrap(), 0);
        assert_eq!(store.add("  If B, then C ").unwrap(), 1);
        assert_eq!(store.load().unwrap(), vec!["If A, then B", "If B, then C"]);

        let old = store.edit(0, "If A, then C").unwrap();
        assert_eq!(old, "If A, then B");

        let removed = store.delete(1).unwrap();
        assert_eq!(removed, "If B, then C");
        assert_eq!(store.load().unwrap(), vec!["If A, then C"]);
    }

    #[test]
    fn test_invalid_edits_leave_file_untouched() {
        let dir = tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("input.txt"));
        store.add("If A, then B").unwrap();

        let err = store.add("   ").unwrap_err();
        assert_eq!(err.downcast_ref::<StoreError>(), Some(&StoreError::EmptyRule));

        let err = store.delete(3).unwrap_err();
        assert_eq!(
            err.downcast_ref::<StoreError>(),
            Some(&StoreError::IndexOutOfRange { index: 4, len: 1 })
        );
        assert!(store.edit(0, "").is_err());

        assert_eq!(store.load().unwrap(), vec!["If A, then B"]);
    }

    #[test]
    fn test_multi_line_rule_rejected() {
        let dir = tempdir().unwrap();
        let store = RuleStore::new(dir.path().join("input.txt"));
        store.add("If A, then B").unwrap();

        let err = store.add("If a, then b\nIf c, then d").unwrap_err();
        assert_eq!(err.downcast_ref::<StoreError>(), Some(&StoreError::MultiLineRule));

        let err = store.edit(0, "If a, then b\r\nIf c, then d").unwrap_err();
        assert_eq!(err.downcast_ref::<StoreError>(), Some(&StoreError::MultiLineRule));
        assert!(store.add("If a, then b\rc").is_err());

        assert_eq!(store.load().unwrap(), vec!["If A, then B"]);
    }
}
