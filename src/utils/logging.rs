//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{AssessmentResult, Session};

/// 初始化日志
///
/// `RUST_LOG` 优先；否则按 `verbose` 选择 info 或 debug。
/// 日志写到 stderr，stdout 留给终端界面
pub fn init(verbose: bool) {
    let default_level = if verbose { "risk_wizard=debug" } else { "risk_wizard=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 风险评估问卷启动");
    info!("🌐 服务端: {}", config.base_url);
    info!("📋 默认题目数: {}", config.default_total_questions);
    info!("{}", "=".repeat(60));
}

/// 记录一次评估的汇总
pub fn log_session_summary(session: &Session, result: &AssessmentResult) {
    info!("{}", "─".repeat(60));
    info!("📊 会话 {} 完成", session.session_id());
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("作答: {}/{}", session.answered(), session.total_questions());
    info!("风险画像: {} | 风险评分: {}", result.risk_profile, result.risk_score);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("风险评估问卷", 4), "风险评估...");
    }
}
