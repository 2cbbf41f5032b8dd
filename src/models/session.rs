//! 一次问卷作答的会话状态

use std::fmt;

use indexmap::IndexMap;

/// 作答会话
///
/// 不变量：`0 <= current_index <= total_questions`
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    session_id: String,
    current_index: usize,
    /// `question_<n>` → 所选值，按作答顺序排列
    responses: IndexMap<String, String>,
    total_questions: usize,
    /// 题目总数是否已由服务端确定
    total_locked: bool,
}

/// 进度信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 当前题号（从 1 开始）
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.current as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "第 {} 题 / 共 {} 题", self.current, self.total)
    }
}

impl Session {
    /// 创建新会话，会话 ID 形如 `user_<毫秒时间戳>`
    pub fn new(default_total: usize) -> Self {
        Self::with_id(
            format!("user_{}", chrono::Utc::now().timestamp_millis()),
            default_total,
        )
    }

    pub fn with_id(session_id: impl Into<String>, default_total: usize) -> Self {
        Self {
            session_id: session_id.into(),
            current_index: 0,
            responses: IndexMap::new(),
            total_questions: default_total.max(1),
            total_locked: false,
        }
    }

    /// 清空作答进度，会话 ID 保持不变
    pub fn reset(&mut self, default_total: usize) {
        self.current_index = 0;
        self.responses.clear();
        self.total_questions = default_total.max(1);
        self.total_locked = false;
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn responses(&self) -> &IndexMap<String, String> {
        &self.responses
    }

    pub fn answered(&self) -> usize {
        self.responses.len()
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.total_questions
    }

    /// 当前题目对应的答案键
    pub fn current_key(&self) -> String {
        format!("question_{}", self.current_index + 1)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            current: (self.current_index + 1).min(self.total_questions),
            total: self.total_questions,
        }
    }

    /// 采用服务端给出的题目总数
    ///
    /// 只在第一次成功获取题目时生效，之后锁定
    pub fn apply_total_questions(&mut self, total: Option<usize>) {
        if self.total_locked {
            return;
        }
        if let Some(total) = total.filter(|t| *t >= self.current_index.max(1)) {
            self.total_questions = total;
        }
        self.total_locked = true;
    }

    /// 记录当前题目的答案并前进一题，返回答案键
    ///
    /// 会话已完成时不做任何修改并返回 `None`
    pub fn record_answer(&mut self, value: impl Into<String>) -> Option<String> {
        if self.is_complete() {
            return None;
        }
        let key = self.current_key();
        self.responses.insert(key.clone(), value.into());
        self.current_index += 1;
        Some(key)
    }
}
