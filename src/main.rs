//! RuleCheck - 规则库检查与认知模型稳定性分析工具
//!
//! 核心设计原则：
//! - 检查逻辑无状态，每次检查都从规则文本重新推导
//! - 格式不符的规则只是被忽略，不会被拒绝
//! - 输入错误以警告形式报告，不修改已保存的数据

pub mod cli;
pub mod core;
pub mod storage;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::cognitive::ModelError;
use crate::storage::rule_store::StoreError;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("rulecheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rulecheck=warn"))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    init_logging(cli.verbose);

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // 用户输入错误只是警告
            if e.is::<StoreError>() || e.is::<ModelError>() {
                eprintln!("警告: {}", e);
            } else {
                tracing::error!("执行失败: {:#}", e);
                eprintln!("错误: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}
