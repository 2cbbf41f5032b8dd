//! 题目模型与题目接口响应校验

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::error::ApiError;

/// 题目标识，服务端可能给数字也可能给字符串
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// 单个选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    #[serde(deserialize_with = "deserialize_option_value")]
    pub value: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 一道题目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub options: Vec<AnswerOption>,
}

/// 纯文本题目使用的五级量表，选项值即显示文本
pub const LIKERT_SCALE: [&str; 5] = [
    "Strongly Disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly Agree",
];

impl Question {
    /// 用纯文本构造五级量表题
    pub fn likert(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: QuestionId::Text(id.into()),
            text: text.into(),
            description: None,
            options: LIKERT_SCALE
                .iter()
                .map(|label| AnswerOption {
                    value: label.to_string(),
                    text: label.to_string(),
                    description: None,
                })
                .collect(),
        }
    }

    /// 是否有可选项
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// 按 value 查找选项
    pub fn find_option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// 校验后的题目接口响应
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPayload {
    pub question: Question,
    /// 服务端给出的题目总数（为 0 时视为未给出）
    pub total_questions: Option<usize>,
}

/// 反序列化用的原始题目，id 允许缺失以便给出明确的错误信息
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    id: Option<QuestionId>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_options")]
    options: Vec<AnswerOption>,
}

impl QuestionPayload {
    /// 校验题目接口的 JSON 响应
    ///
    /// 缺少 question、id 为空都视为格式错误；options 缺失或不是数组时降级为空列表。
    /// question 为纯文本时按五级量表题处理，id 取 `fallback_key`
    pub fn from_json(payload: JsonValue, fallback_key: &str) -> Result<Self, ApiError> {
        let JsonValue::Object(mut body) = payload else {
            return Err(ApiError::malformed("响应不是 JSON 对象"));
        };

        if let Some(err) = body.get("error").filter(|v| !v.is_null()) {
            let message = err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string());
            return Err(ApiError::malformed(format!("服务端返回错误: {}", message)));
        }

        let total_questions = body
            .get("total_questions")
            .and_then(JsonValue::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n > 0);

        let question = match body.remove("question") {
            None | Some(JsonValue::Null) => {
                return Err(ApiError::malformed("缺少 question 字段"));
            }
            Some(JsonValue::String(text)) => {
                if text.trim().is_empty() {
                    return Err(ApiError::malformed("question 文本为空"));
                }
                Question::likert(fallback_key, text.trim())
            }
            Some(value @ JsonValue::Object(_)) => {
                let raw = serde_json::from_value::<RawQuestion>(value)
                    .map_err(|e| ApiError::malformed(format!("question 字段无法解析: {}", e)))?;
                let id = raw
                    .id
                    .ok_or_else(|| ApiError::malformed("question.id 为空"))?;
                Question {
                    id,
                    text: raw.text,
                    description: raw.description.filter(|d| !d.trim().is_empty()),
                    options: raw.options,
                }
            }
            Some(_) => return Err(ApiError::malformed("question 字段必须是对象或文本")),
        };

        Ok(Self {
            question,
            total_questions,
        })
    }
}

/// 选项值可以是字符串或数字
fn deserialize_option_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("无效的选项值: {}", other))),
    }
}

/// options 不是数组时返回空列表，数组中无法解析的项跳过
fn deserialize_lenient_options<'de, D>(deserializer: D) -> Result<Vec<AnswerOption>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<JsonValue>::deserialize(deserializer)? {
        Some(JsonValue::Array(items)) => items,
        None | Some(JsonValue::Null) => return Ok(Vec::new()),
        Some(_) => {
            warn!("options 字段不是数组，按无选项处理");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<AnswerOption>(item) {
            Ok(option) => Some(option),
            Err(e) => {
                warn!("跳过无法解析的选项: {}", e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(payload: JsonValue) -> Result<QuestionPayload, ApiError> {
        QuestionPayload::from_json(payload, "question_1")
    }

    #[test]
    fn parses_full_question() {
        let payload = parse(json!({
            "question": {
                "id": 1,
                "text": "Q1",
                "description": "市场波动",
                "options": [
                    {"value": "a", "text": "Agree", "description": "同意"},
                    {"value": 5, "text": "Strongly Agree"}
                ]
            },
            "total_questions": 8
        }))
        .unwrap();

        assert_eq!(payload.question.id, QuestionId::Number(1));
        assert_eq!(payload.question.options.len(), 2);
        assert_eq!(payload.question.options[1].value, "5");
        assert_eq!(payload.total_questions, Some(8));
        assert!(payload.question.find_option("a").is_some());
        assert!(payload.question.find_option("b").is_none());
    }

    #[test]
    fn missing_question_is_malformed() {
        let err = parse(json!({"total_questions": 10})).unwrap_err();
        assert!(matches!(err, ApiError::MalformedPayload { .. }));

        let err = parse(json!({"question": null})).unwrap_err();
        assert!(err.to_string().contains("question"));

        assert!(parse(json!("Q1")).is_err());
        assert!(parse(json!({"question": 42})).is_err());
        assert!(parse(json!({"question": "   "})).is_err());
    }

    #[test]
    fn text_question_uses_five_point_scale() {
        let payload = QuestionPayload::from_json(
            json!({"question": "To what extent do you agree or disagree with the following statement: I am comfortable with short-term market volatility."}),
            "question_3",
        )
        .unwrap();

        let question = payload.question;
        assert_eq!(question.id, QuestionId::Text("question_3".to_string()));
        assert!(question.text.starts_with("To what extent"));
        let values: Vec<_> = question.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, LIKERT_SCALE.to_vec());
        assert_eq!(question.find_option("Neutral").unwrap().text, "Neutral");
        assert_eq!(payload.total_questions, None);
    }

    #[test]
    fn null_or_missing_id_is_malformed() {
        assert!(parse(json!({"question": {"id": null, "text": "Q"}})).is_err());
        assert!(parse(json!({"question": {"text": "Q"}})).is_err());

        let payload = parse(json!({"question": {"id": "risk-3", "text": "Q"}})).unwrap();
        assert_eq!(payload.question.id.to_string(), "risk-3");
    }

    #[test]
    fn server_error_field_is_surfaced() {
        let err = parse(json!({"error": "LLM 超时"})).unwrap_err();
        assert!(err.to_string().contains("LLM 超时"));
    }

    #[test]
    fn missing_or_invalid_options_degrade_to_empty() {
        let payload = parse(json!({"question": {"id": 2, "text": "Q2"}})).unwrap();
        assert!(!payload.question.has_options());

        let payload = parse(json!({
            "question": {"id": 2, "text": "Q2", "options": "Agree,Disagree"}
        }))
        .unwrap();
        assert!(payload.question.options.is_empty());

        let payload = parse(json!({
            "question": {"id": 2, "text": "Q2", "options": [{"text": "no value"}, {"value": "b", "text": "B"}]}
        }))
        .unwrap();
        assert_eq!(payload.question.options.len(), 1);
        assert_eq!(payload.question.options[0].value, "b");
    }

    #[test]
    fn zero_total_is_ignored() {
        let payload = parse(json!({
            "question": {"id": 1, "text": "Q1"},
            "total_questions": 0
        }))
        .unwrap();
        assert_eq!(payload.total_questions, None);
    }
}
