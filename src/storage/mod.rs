//! 存储模块 - 规则文件、认知模型文件和配置文件

pub mod config;
pub mod model_store;
pub mod rule_store;
