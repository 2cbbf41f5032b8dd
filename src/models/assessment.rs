//! 请求体与评估结果

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ApiError;
use crate::models::session::Session;

/// 题目生成接口请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionRequest {
    pub previous_responses: IndexMap<String, String>,
}

impl QuestionRequest {
    pub fn from_session(session: &Session) -> Self {
        Self {
            previous_responses: session.responses().clone(),
        }
    }
}

/// 风险评估接口请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRequest {
    pub user_id: String,
    pub responses: IndexMap<String, String>,
}

impl AssessmentRequest {
    pub fn from_session(session: &Session) -> Self {
        Self {
            user_id: session.session_id().to_string(),
            responses: session.responses().clone(),
        }
    }
}

/// 评估结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub risk_profile: String,
    pub risk_score: f64,
    /// 题目文本 → 答案文本，保持服务端给出的顺序
    #[serde(default)]
    pub detailed_responses: IndexMap<String, String>,
}

impl AssessmentResult {
    /// 校验评估接口的 JSON 响应
    pub fn from_json(payload: JsonValue) -> Result<Self, ApiError> {
        if let Some(err) = payload.get("error").filter(|v| !v.is_null()) {
            let message = err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string());
            return Err(ApiError::malformed(format!("服务端返回错误: {}", message)));
        }
        serde_json::from_value(payload)
            .map_err(|e| ApiError::malformed(format!("评估结果无法解析: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_serialize_to_wire_shape() {
        let mut session = Session::with_id("user_42", 10);
        session.record_answer("Agree");

        assert_eq!(
            serde_json::to_value(QuestionRequest::from_session(&session)).unwrap(),
            json!({"previous_responses": {"question_1": "Agree"}})
        );
        assert_eq!(
            serde_json::to_value(AssessmentRequest::from_session(&session)).unwrap(),
            json!({"user_id": "user_42", "responses": {"question_1": "Agree"}})
        );
    }

    #[test]
    fn result_keeps_server_order() {
        let result = AssessmentResult::from_json(json!({
            "risk_profile": "moderate",
            "risk_score": 62.5,
            "detailed_responses": {"Q2": "Agree", "Q1": "Neutral"}
        }))
        .unwrap();

        assert_eq!(result.risk_profile, "moderate");
        let keys: Vec<_> = result.detailed_responses.keys().cloned().collect();
        assert_eq!(keys, vec!["Q2", "Q1"]);
    }

    #[test]
    fn result_missing_fields_is_malformed() {
        assert!(AssessmentResult::from_json(json!({"risk_score": 10})).is_err());
        assert!(AssessmentResult::from_json(json!({"error": "Missing user_id"})).is_err());

        let result =
            AssessmentResult::from_json(json!({"risk_profile": "low", "risk_score": 0})).unwrap();
        assert!(result.detailed_responses.is_empty());
    }
}
