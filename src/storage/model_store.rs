//! 认知模型存储模块

use crate::core::cognitive::CognitiveModel;
use anyhow::Result;
use std::path::PathBuf;

/// 认知模型存储（JSON）
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// 加载模型，文件不存在时返回空模型
    pub fn load(&self) -> Result<CognitiveModel> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(CognitiveModel::default())
        }
    }

    /// 保存模型
    pub fn save(&self, model: &CognitiveModel) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(model)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
