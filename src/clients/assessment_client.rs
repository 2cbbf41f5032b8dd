//! 问卷服务端客户端
//!
//! 封装题目生成与风险评估两个接口的调用

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::infrastructure::HttpExecutor;
use crate::models::{AssessmentRequest, QuestionRequest};

/// 远程服务能力
///
/// 只负责传输，响应的字段校验由流程层完成
#[async_trait]
pub trait AssessmentBackend: Send + Sync {
    /// 请求下一道题目
    async fn fetch_question(&self, request: &QuestionRequest) -> Result<JsonValue, ApiError>;

    /// 提交全部答案，取回评估结果
    async fn assess_risk(&self, request: &AssessmentRequest) -> Result<JsonValue, ApiError>;
}

/// 基于 HTTP 的问卷服务端客户端
pub struct AssessmentClient {
    executor: HttpExecutor,
    question_endpoint: String,
    assess_endpoint: String,
}

impl AssessmentClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Ok(Self {
            executor: HttpExecutor::new(&config.base_url, config.request_timeout())?,
            question_endpoint: config.question_endpoint.clone(),
            assess_endpoint: config.assess_endpoint.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.executor.base_url()
    }
}

#[async_trait]
impl AssessmentBackend for AssessmentClient {
    async fn fetch_question(&self, request: &QuestionRequest) -> Result<JsonValue, ApiError> {
        debug!("请求题目，已作答 {} 题", request.previous_responses.len());
        self.executor.post(&self.question_endpoint, request).await
    }

    async fn assess_risk(&self, request: &AssessmentRequest) -> Result<JsonValue, ApiError> {
        debug!(
            "提交评估: 用户 {}，共 {} 个答案",
            request.user_id,
            request.responses.len()
        );
        self.executor.post(&self.assess_endpoint, request).await
    }
}
