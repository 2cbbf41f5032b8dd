use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use risk_wizard::utils::logging;
use risk_wizard::{App, Config};

/// 投资风险评估问卷
#[derive(Parser, Debug)]
#[command(name = "risk-wizard", version, about)]
struct Cli {
    /// TOML 配置文件
    #[arg(short, long, env = "RISK_WIZARD_CONFIG")]
    config: Option<PathBuf>,

    /// 服务端地址，覆盖配置文件
    #[arg(long)]
    base_url: Option<String>,

    /// 默认题目总数，覆盖配置文件
    #[arg(long)]
    total_questions: Option<usize>,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(total) = cli.total_questions {
        config.default_total_questions = total;
    }
    config.verbose_logging |= cli.verbose;
    config.validate()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}
