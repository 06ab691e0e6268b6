use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "rulecheck")]
#[command(author, version, about = "规则库检查与认知模型稳定性分析", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 规则文件路径（默认取配置中的 rules_file）
    #[arg(long, global = true, env = "RULECHECK_RULES")]
    pub rules: Option<PathBuf>,

    /// 认知模型文件路径（默认取配置中的 model_file）
    #[arg(long, global = true, env = "RULECHECK_MODEL")]
    pub model: Option<PathBuf>,

    /// 配置文件路径
    #[arg(long, global = true, env = "RULECHECK_CONFIG")]
    pub config: Option<PathBuf>,
}

/// 输出格式
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 编辑规则列表
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// 执行矛盾、冗余和循环检查
    Check {
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// 编辑认知模型
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// 查看或初始化配置
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// 列出所有规则
    List,

    /// 添加规则
    Add {
        /// 规则文本，如 "If rain, then wet"
        rule: String,
    },

    /// 修改规则
    Edit {
        /// 规则编号（从1开始，与 list 输出一致）
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        number: u64,

        /// 新规则文本
        rule: String,
    },

    /// 删除规则
    Delete {
        /// 规则编号（从1开始，与 list 输出一致）
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        number: u64,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// 显示顶点、连接和邻接矩阵
    Show,

    /// 添加顶点
    AddVertex { name: String },

    /// 删除顶点及其连接
    RemoveVertex { name: String },

    /// 添加或更新连接，格式: "顶点1, 顶点2, 权重"
    Connect { spec: String },

    /// 删除连接
    Disconnect { from: String, to: String },

    /// 检查稳定性
    Stability {
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// 显示当前配置
    Show,

    /// 写入默认配置
    Init {
        /// 使用俄文规则语法 "Если ..., то ..."
        #[arg(long)]
        russian: bool,
    },
}
