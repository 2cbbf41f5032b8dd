//! 问卷流程状态

use std::fmt::Display;

use crate::models::{AssessmentResult, Question};

/// 出错后可重试的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    /// 重新获取当前题目
    FetchQuestion,
    /// 重新提交全部答案
    Submit,
}

/// 错误状态
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorState {
    /// 展示给用户的信息
    pub message: String,
    /// 为 `None` 时本次会话无法继续
    pub retry: Option<RetryAction>,
}

/// 问卷流程状态
///
/// `Welcome → Loading → AwaitingAnswer → (Loading | Submitting) → ShowingResults`，
/// 获取题目或提交失败时进入 `Error`
#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    Welcome,
    Loading,
    AwaitingAnswer(Question),
    Submitting,
    ShowingResults(AssessmentResult),
    Error(ErrorState),
}

impl WizardState {
    /// 状态名（用于日志与错误信息）
    pub fn name(&self) -> &'static str {
        match self {
            WizardState::Welcome => "Welcome",
            WizardState::Loading => "Loading",
            WizardState::AwaitingAnswer(_) => "AwaitingAnswer",
            WizardState::Submitting => "Submitting",
            WizardState::ShowingResults(_) => "ShowingResults",
            WizardState::Error(_) => "Error",
        }
    }

    /// 是否有请求正在进行
    pub fn is_busy(&self) -> bool {
        matches!(self, WizardState::Loading | WizardState::Submitting)
    }
}

impl Display for WizardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardState::AwaitingAnswer(question) => {
                write!(f, "[{} 题目#{}]", self.name(), question.id)
            }
            WizardState::Error(error) => write!(f, "[{}: {}]", self.name(), error.message),
            _ => write!(f, "[{}]", self.name()),
        }
    }
}
