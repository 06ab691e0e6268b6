//! 配置文件管理模块

use crate::core::models::AppConfig;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// 配置管理器
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// 获取默认配置路径
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "rulecheck", "RuleCheck")
            .map(|d| d.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    }

    /// 加载配置，文件不存在时使用默认配置
    pub fn load(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            tracing::debug!("配置文件不存在，使用默认配置: {}", self.config_path.display());
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("配置文件格式错误: {}", self.config_path.display()))?;

        // 前缀或分隔符为空时任何规则都无法解析
        if config.syntax.prefix.trim().is_empty() || config.syntax.separator.trim().is_empty() {
            bail!("规则语法的前缀和分隔符不能为空: {}", self.config_path.display());
        }

        Ok(config)
    }

    /// 保存配置
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }
}
