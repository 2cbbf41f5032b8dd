//! HTTP 执行器 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端，只暴露"POST JSON 并取回 JSON"的能力

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::utils::logging::truncate_text;

/// HTTP 执行器
///
/// 职责：
/// - 持有 reqwest Client 与服务端地址
/// - 把网络错误、非 2xx 状态、非 JSON 响应分别映射为 ApiError
/// - 不认识 Question / Session
pub struct HttpExecutor {
    client: Client,
    base_url: String,
}

impl HttpExecutor {
    /// 创建新的 HTTP 执行器
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::ClientInit { source })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// 发送 JSON POST 请求并返回 JSON 结果
    pub async fn post<T>(&self, endpoint: &str, body: &T) -> Result<JsonValue, ApiError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let url = self.url(endpoint);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::network(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            // 错误响应体读不出来时状态码依然有效
            let body = response.text().await.unwrap_or_default();
            warn!("{} 返回状态码 {}: {}", endpoint, status, truncate_text(&body, 200));
            return Err(ApiError::HttpError {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::network(endpoint, e))?;

        debug!("{} 响应: {}", endpoint, truncate_text(&text, 500));

        serde_json::from_str(&text).map_err(|e| {
            ApiError::malformed(format!("{} 返回的不是合法 JSON: {}", endpoint, e))
        })
    }
}
