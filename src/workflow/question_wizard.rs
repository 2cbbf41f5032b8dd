//! 问卷向导 - 流程层
//!
//! 核心职责：驱动一次作答会话的完整流程
//!
//! 流程顺序：
//! 1. start → 获取第 1 题
//! 2. submit_answer → 记录答案 → 获取下一题
//! 3. 最后一题作答后 → 提交全部答案 → 展示结果
//!
//! 获取题目失败可重试；提交失败是否可重试由配置决定

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::clients::AssessmentBackend;
use crate::config::Config;
use crate::error::WizardError;
use crate::models::{
    AssessmentRequest, AssessmentResult, Question, QuestionPayload, QuestionRequest, Session,
};
use crate::services::Renderer;
use crate::utils::logging::truncate_text;
use crate::workflow::wizard_state::{ErrorState, RetryAction, WizardState};

/// 未选择选项时的提示
pub const NO_SELECTION_MESSAGE: &str = "请先选择一个选项再继续。";

/// 提交失败时展示给用户的信息，具体原因只写日志
pub const SUBMIT_ERROR_MESSAGE: &str = "提交答案时出错";

/// 流程参数
#[derive(Debug, Clone)]
pub struct WizardSettings {
    /// 服务端未给出题目总数时使用
    pub default_total_questions: usize,
    /// 校验提示的显示时长
    pub validation_display: Duration,
    /// 提交失败后是否允许重试
    pub allow_submit_retry: bool,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for WizardSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_total_questions: config.default_total_questions,
            validation_display: config.validation_display(),
            allow_submit_retry: config.allow_submit_retry,
        }
    }
}

/// 问卷向导
///
/// - 持有唯一的会话状态
/// - 通过 `AssessmentBackend` 访问服务端，通过 `Renderer` 产生界面效果
/// - 所有操作都需要 `&mut self`，同一会话不会同时存在两个请求
pub struct QuestionWizard<B, R> {
    backend: B,
    renderer: R,
    settings: WizardSettings,
    session: Session,
    state: WizardState,
}

impl<B, R> QuestionWizard<B, R>
where
    B: AssessmentBackend,
    R: Renderer,
{
    /// 创建向导，初始状态为 `Welcome`
    pub fn new(backend: B, renderer: R, settings: WizardSettings) -> Self {
        let session = Session::new(settings.default_total_questions);
        Self::with_session(backend, renderer, settings, session)
    }

    pub fn with_session(backend: B, renderer: R, settings: WizardSettings, session: Session) -> Self {
        let mut wizard = Self {
            backend,
            renderer,
            settings,
            session,
            state: WizardState::Welcome,
        };
        wizard.renderer.render(&wizard.state, &wizard.session);
        wizard
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            WizardState::AwaitingAnswer(question) => Some(question),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&AssessmentResult> {
        match &self.state {
            WizardState::ShowingResults(result) => Some(result),
            _ => None,
        }
    }

    /// 开始评估：清空作答并获取第 1 题
    pub async fn start(&mut self) -> Result<(), WizardError> {
        if !matches!(self.state, WizardState::Welcome) {
            return Err(self.rejected("start"));
        }

        info!("▶ 开始评估 (会话 {})", self.session.session_id());
        self.session.reset(self.settings.default_total_questions);
        self.transition(WizardState::Loading);
        self.load_question().await;
        Ok(())
    }

    /// 获取当前题目
    ///
    /// 在 `Loading` 中或获取失败后的 `Error` 中可调用（即重试）
    pub async fn fetch_question(&mut self) -> Result<(), WizardError> {
        match &self.state {
            WizardState::Loading => {}
            WizardState::Error(ErrorState {
                retry: Some(RetryAction::FetchQuestion),
                ..
            }) => self.transition(WizardState::Loading),
            _ => return Err(self.rejected("fetch_question")),
        }

        self.load_question().await;
        Ok(())
    }

    /// 提交当前题目的答案
    ///
    /// 未选择（或选项无效）时返回 `Validation`，会话不变
    pub async fn submit_answer(&mut self, value: Option<&str>) -> Result<(), WizardError> {
        let WizardState::AwaitingAnswer(question) = &self.state else {
            return Err(self.rejected("submit_answer"));
        };

        let checked = match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Err(NO_SELECTION_MESSAGE.to_string()),
            Some(v) if question.has_options() && question.find_option(v).is_none() => {
                Err(format!("无效的选项: {}", v))
            }
            Some(v) => Ok(v.to_string()),
        };

        let value = match checked {
            Ok(value) => value,
            Err(message) => {
                warn!("答案校验失败: {}", message);
                self.renderer
                    .show_error(&message, Some(self.settings.validation_display))
                    .await;
                return Err(WizardError::Validation(message));
            }
        };

        let Some(key) = self.session.record_answer(value.as_str()) else {
            return Err(self.rejected("submit_answer"));
        };
        info!(
            "✓ 已记录 {} = {} ({}/{})",
            key,
            truncate_text(&value, 40),
            self.session.current_index(),
            self.session.total_questions()
        );

        if self.session.is_complete() {
            self.transition(WizardState::Submitting);
            self.send_assessment().await;
        } else {
            self.transition(WizardState::Loading);
            self.load_question().await;
        }
        Ok(())
    }

    /// 提交全部答案
    ///
    /// 在 `Submitting` 中（会话已完成）或提交失败后的 `Error` 中可调用
    pub async fn submit(&mut self) -> Result<(), WizardError> {
        match &self.state {
            WizardState::Submitting if self.session.is_complete() => {}
            WizardState::Error(ErrorState {
                retry: Some(RetryAction::Submit),
                ..
            }) => self.transition(WizardState::Submitting),
            _ => return Err(self.rejected("submit")),
        }

        self.send_assessment().await;
        Ok(())
    }

    /// 按错误状态重试对应的操作
    pub async fn retry(&mut self) -> Result<(), WizardError> {
        match &self.state {
            WizardState::Error(ErrorState {
                retry: Some(RetryAction::FetchQuestion),
                ..
            }) => self.fetch_question().await,
            WizardState::Error(ErrorState {
                retry: Some(RetryAction::Submit),
                ..
            }) => self.submit().await,
            _ => Err(self.rejected("retry")),
        }
    }

    /// 重新开始：清空会话并回到欢迎页
    pub fn restart(&mut self) {
        info!("↺ 重新开始评估");
        self.session.reset(self.settings.default_total_questions);
        self.transition(WizardState::Welcome);
    }

    // ========== 内部步骤 ==========

    async fn load_question(&mut self) {
        let request = QuestionRequest::from_session(&self.session);
        let key = self.session.current_key();
        debug!("请求第 {} 题", self.session.current_index() + 1);

        self.renderer.show_loading(true);
        let outcome = self
            .backend
            .fetch_question(&request)
            .await
            .and_then(|payload| QuestionPayload::from_json(payload, &key));
        self.renderer.show_loading(false);

        match outcome {
            Ok(payload) => {
                self.session.apply_total_questions(payload.total_questions);
                let question = payload.question;
                if !question.has_options() {
                    warn!("题目#{} 没有可选项", question.id);
                }
                info!(
                    "✓ {}: {}",
                    self.session.progress(),
                    truncate_text(&question.text, 80)
                );
                self.transition(WizardState::AwaitingAnswer(question));
            }
            Err(e) => {
                error!(status = ?e.status(), "获取题目失败: {}", e);
                self.transition(WizardState::Error(ErrorState {
                    message: e.to_string(),
                    retry: Some(RetryAction::FetchQuestion),
                }));
            }
        }
    }

    async fn send_assessment(&mut self) {
        let request = AssessmentRequest::from_session(&self.session);
        info!("📤 提交 {} 个答案...", request.responses.len());

        self.renderer.show_loading(true);
        let outcome = self
            .backend
            .assess_risk(&request)
            .await
            .and_then(AssessmentResult::from_json);
        self.renderer.show_loading(false);

        match outcome {
            Ok(result) => {
                info!(
                    "✓ 评估完成: {} (评分 {})",
                    result.risk_profile, result.risk_score
                );
                self.transition(WizardState::ShowingResults(result));
            }
            Err(e) => {
                error!("提交答案失败: {}", e);
                let retry = self
                    .settings
                    .allow_submit_retry
                    .then_some(RetryAction::Submit);
                self.transition(WizardState::Error(ErrorState {
                    message: SUBMIT_ERROR_MESSAGE.to_string(),
                    retry,
                }));
            }
        }
    }

    fn transition(&mut self, next: WizardState) {
        debug!("状态切换: {} → {}", self.state.name(), next.name());
        self.state = next;
        self.renderer.render(&self.state, &self.session);
    }

    fn rejected(&self, operation: &'static str) -> WizardError {
        warn!("当前状态 {} 不允许执行 {}", self.state, operation);
        WizardError::invalid_transition(operation, self.state.name())
    }
}
