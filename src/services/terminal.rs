//! 终端界面
//!
//! `TerminalRenderer` 负责输出，`TerminalPrompt` 负责读取用户输入

use std::time::Duration;

use async_trait::async_trait;
use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::models::{AssessmentResult, Progress, Question, Session};
use crate::services::renderer::Renderer;
use crate::workflow::{ErrorState, WizardState};

/// 进度条宽度（字符数）
const PROGRESS_BAR_WIDTH: usize = 20;

/// 终端渲染器
pub struct TerminalRenderer {
    term: Term,
    spinner: Option<ProgressBar>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            spinner: None,
        }
    }

    fn line(&self, text: impl AsRef<str>) {
        if let Err(e) = self.term.write_line(text.as_ref()) {
            warn!("终端输出失败: {}", e);
        }
    }

    fn render_welcome(&self, session: &Session) {
        self.line("");
        self.line(format!("{}", style("  投资风险评估问卷").cyan().bold()));
        self.line(format!(
            "  {}",
            style(format!(
                "回答约 {} 道题目，了解您的投资风险偏好",
                session.total_questions()
            ))
            .dim()
        ));
        self.line("");
    }

    fn render_question(&self, question: &Question, progress: Progress) {
        self.line("");
        self.line(format!(
            "  {}  {}",
            style(progress.to_string()).bold(),
            progress_bar(progress)
        ));
        self.line("");
        self.line(format!("  {}", style(&question.text).bold()));
        if let Some(description) = &question.description {
            self.line(format!("  {}", style(description).dim()));
        }
        if !question.has_options() {
            self.line(format!(
                "  {}",
                style("该题目暂无可选项，请联系支持人员。").yellow()
            ));
        }
        self.line("");
    }

    fn render_results(&self, result: &AssessmentResult) {
        self.line("");
        self.line(format!("{}", style("  评估完成").green().bold()));
        self.line(format!("  风险画像: {}", style(&result.risk_profile).cyan()));
        self.line(format!("  风险评分: {}", style(format!("{:.1}", result.risk_score)).cyan()));
        if !result.detailed_responses.is_empty() {
            self.line("");
            self.line(format!("  {}", style("作答明细").bold()));
            for (question, answer) in &result.detailed_responses {
                self.line(format!("  • {}", question));
                self.line(format!("    {}", style(answer).dim()));
            }
        }
        self.line("");
    }

    fn render_error(&self, error: &ErrorState) {
        self.line(format!("  {} {}", style("✗").red(), style(&error.message).red()));
        if error.retry.is_none() {
            self.line(format!("  {}", style("本次会话无法继续，请重新启动程序。").dim()));
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Renderer for TerminalRenderer {
    fn render(&mut self, state: &WizardState, session: &Session) {
        match state {
            WizardState::Welcome => self.render_welcome(session),
            WizardState::Loading => {
                self.line(format!("  {}", style(format!("正在加载第 {} 题...", session.progress().current)).dim()))
            }
            WizardState::AwaitingAnswer(question) => {
                self.render_question(question, session.progress())
            }
            WizardState::Submitting => self.line(format!("  {}", style("正在提交答案...").dim())),
            WizardState::ShowingResults(result) => self.render_results(result),
            WizardState::Error(error) => self.render_error(error),
        }
    }

    fn show_loading(&mut self, loading: bool) {
        if loading {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("  {spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message("请稍候");
            spinner.enable_steady_tick(Duration::from_millis(100));
            self.spinner = Some(spinner);
        } else if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    async fn show_error(&mut self, message: &str, display_for: Option<Duration>) {
        self.line(format!("  {} {}", style("!").yellow().bold(), style(message).yellow()));
        if let Some(duration) = display_for {
            tokio::time::sleep(duration).await;
            if let Err(e) = self.term.clear_last_lines(1) {
                warn!("清除提示失败: {}", e);
            }
        }
    }
}

/// 终端输入
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    pub fn confirm_start(&self) -> dialoguer::Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt("开始评估？")
            .default(true)
            .interact()
    }

    /// 选择答案，按 Esc 视为未选择
    ///
    /// 题目没有选项时改为自由输入
    pub fn choose_answer(&self, question: &Question) -> dialoguer::Result<Option<String>> {
        if !question.has_options() {
            let input: String = Input::with_theme(&self.theme)
                .with_prompt("请输入您的回答")
                .allow_empty(true)
                .interact_text()?;
            return Ok(Some(input));
        }

        let items: Vec<String> = question
            .options
            .iter()
            .map(|option| match &option.description {
                Some(description) => format!("{} ({})", option.text, description),
                None => option.text.clone(),
            })
            .collect();

        let selection = Select::with_theme(&self.theme)
            .with_prompt("请选择（Esc 跳过）")
            .items(&items)
            .default(0)
            .interact_opt()?;

        Ok(selection.map(|index| question.options[index].value.clone()))
    }

    pub fn confirm_retry(&self) -> dialoguer::Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt("是否重试？")
            .default(true)
            .interact()
    }

    pub fn confirm_restart(&self) -> dialoguer::Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt("重新评估？")
            .default(false)
            .interact()
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

/// 文本进度条，如 `[█████░░░░░] 50%`
fn progress_bar(progress: Progress) -> String {
    let percent = progress.percent();
    let filled = ((percent / 100.0) * PROGRESS_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(PROGRESS_BAR_WIDTH);
    format!(
        "[{}{}] {:.0}%",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled),
        percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(
            progress_bar(Progress { current: 5, total: 10 }),
            format!("[{}{}] 50%", "█".repeat(10), "░".repeat(10))
        );
        assert!(progress_bar(Progress { current: 10, total: 10 }).ends_with("] 100%"));
    }
}
