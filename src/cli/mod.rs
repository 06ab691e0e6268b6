//! 命令行界面
//!
//! 表现层只负责读写文件和打印结果，所有检查逻辑都在 core 中。

mod commands;

pub use commands::{Cli, Commands, ConfigAction, ModelAction, OutputFormat, RulesAction};

use crate::core::checker::RuleChecker;
use crate::core::cognitive::CognitiveModel;
use crate::core::models::{AppConfig, RuleSyntax};
use crate::storage::config::ConfigManager;
use crate::storage::model_store::ModelStore;
use crate::storage::rule_store::RuleStore;
use anyhow::Result;
use std::path::PathBuf;

/// 解析后的运行环境
pub struct Context {
    pub config_path: PathBuf,
    pub config: AppConfig,
    pub rules: RuleStore,
    pub model: ModelStore,
}

impl Context {
    /// 加载配置并用命令行参数覆盖文件路径
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli.config.clone().unwrap_or_else(ConfigManager::default_path);
        let config = ConfigManager::new(config_path.clone()).load()?;

        let rules_path = cli.rules.clone().unwrap_or_else(|| config.rules_file.clone());
        let model_path = cli.model.clone().unwrap_or_else(|| config.model_file.clone());

        Ok(Self {
            config_path,
            rules: RuleStore::new(rules_path),
            model: ModelStore::new(model_path),
            config,
        })
    }
}

/// 执行命令
pub fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(&cli)?;

    match cli.command {
        Commands::Rules { action } => run_rules(&ctx, action),
        Commands::Check { output } => run_check(&ctx, output),
        Commands::Model { action } => run_model(&ctx, action),
        Commands::Config { action } => run_config(&ctx, action),
    }
}

fn run_rules(ctx: &Context, action: RulesAction) -> Result<()> {
    match action {
        RulesAction::List => {
            let checker = RuleChecker::new(ctx.config.syntax.clone());
            let rules = ctx.rules.load()?;
            if rules.is_empty() {
                println!("规则列表为空: {}", ctx.rules.path().display());
            }
            for (idx, rule) in rules.iter().enumerate() {
                if checker.parser().parse(rule).is_some() {
                    println!("{}. {}", idx + 1, rule);
                } else {
                    println!("{}. {}  (格式不符，检查时忽略)", idx + 1, rule);
                }
            }
        }
        RulesAction::Add { rule } => {
            let index = ctx.rules.add(&rule)?;
            println!("已添加规则 #{}", index + 1);
        }
        RulesAction::Edit { number, rule } => {
            let old = ctx.rules.edit(to_index(number), &rule)?;
            println!("已修改规则 #{}: {} -> {}", number, old, rule.trim());
        }
        RulesAction::Delete { number } => {
            let removed = ctx.rules.delete(to_index(number))?;
            println!("已删除规则 #{}: {}", number, removed);
        }
    }
    Ok(())
}

fn run_check(ctx: &Context, output: OutputFormat) -> Result<()> {
    let rules = ctx.rules.load()?;
    let report = RuleChecker::new(ctx.config.syntax.clone()).check_all(&rules);

    match output {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn run_model(ctx: &Context, action: ModelAction) -> Result<()> {
    let mut model = ctx.model.load()?;

    match action {
        ModelAction::Show => {
            print!("{}", render_model(&model));
            return Ok(());
        }
        ModelAction::Stability { output } => {
            let report = model.check_stability();
            match output {
                OutputFormat::Text => {
                    println!("{}", report.stability);
                    if let Some(radius) = report.spectral_radius {
                        println!("谱半径: {:.4}", radius);
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            return Ok(());
        }
        ModelAction::AddVertex { name } => {
            model.add_parameter(&name)?;
            println!("已添加顶点: {}", name.trim());
        }
        ModelAction::RemoveVertex { name } => {
            model.remove_parameter(&name)?;
            println!("已删除顶点: {}", name.trim());
        }
        ModelAction::Connect { spec } => {
            let c = CognitiveModel::parse_connection(&spec)?;
            model.add_connection(&c.from, &c.to, c.weight)?;
            println!("已添加连接: {} -> {} ({})", c.from, c.to, c.weight);
        }
        ModelAction::Disconnect { from, to } => {
            model.remove_connection(&from, &to)?;
            println!("已删除连接: {} -> {}", from, to);
        }
    }

    ctx.model.save(&model)
}

fn run_config(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# {}", ctx.config_path.display());
            println!("{}", serde_json::to_string_pretty(&ctx.config)?);
        }
        ConfigAction::Init { russian } => {
            let mut config = AppConfig::default();
            if russian {
                config.syntax = RuleSyntax::russian();
            }
            ConfigManager::new(ctx.config_path.clone()).save(&config)?;
            println!("已写入配置: {}", ctx.config_path.display());
        }
    }
    Ok(())
}

/// 命令行编号从1开始
fn to_index(number: u64) -> usize {
    (number as usize).saturating_sub(1)
}

/// 渲染认知模型
pub fn render_model(model: &CognitiveModel) -> String {
    let mut out = String::new();

    out.push_str("顶点:\n");
    for v in model.vertices() {
        out.push_str(&format!("  {}\n", v));
    }

    out.push_str("连接:\n");
    for c in model.connections() {
        out.push_str(&format!("  {} -> {} ({})\n", c.from, c.to, c.weight));
    }

    let matrix = model.adjacency_matrix();
    out.push_str("邻接矩阵:\n");
    out.push_str(&format!("\t{}\n", model.vertices().join("\t")));
    for (i, v) in model.vertices().iter().enumerate() {
        let row: Vec<String> = matrix.row(i).iter().map(|w| w.to_string()).collect();
        out.push_str(&format!("{}\t{}\n", v, row.join("\t")));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_model() {
        let mut model = CognitiveModel::new();
        model.add_parameter("a").unwrap();
        model.add_parameter("b").unwrap();
        model.add_connection("a", "b", 0.5).unwrap();

        let text = render_model(&model);
        assert!(text.contains("  a -> b (0.5)\n"));
        assert!(text.contains("\ta\tb\n"));
        assert!(text.contains("a\t0\t0.5\n"));
        assert!(text.contains("b\t0\t0\n"));
    }

    #[test]
    fn test_to_index() {
        assert_eq!(to_index(1), 0);
        assert_eq!(to_index(3), 2);
    }
}
