use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 远程服务调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 问卷流程错误
    #[error("流程错误: {0}")]
    Wizard(#[from] WizardError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件读写错误
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 远程服务调用错误
///
/// 题目获取时的三类失败（网络、HTTP 状态、响应格式）对用户的表现一致：
/// 展示错误信息并提供重试
#[derive(Debug, Error)]
pub enum ApiError {
    /// 请求未能发出或超时
    #[error("网络请求失败 ({endpoint}): {source}")]
    NetworkFailure {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务端返回非 2xx 状态码
    #[error("HTTP 错误 ({endpoint})，状态码: {status}")]
    HttpError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 响应缺少必要字段或无法解析
    #[error("响应格式无效: {reason}")]
    MalformedPayload { reason: String },
    /// HTTP 客户端构建失败
    #[error("HTTP 客户端初始化失败: {source}")]
    ClientInit {
        #[source]
        source: reqwest::Error,
    },
}

/// 问卷流程错误
///
/// 返回这类错误时，控制器状态与会话数据均未改变
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    /// 未选择选项（或选项无效）就尝试继续
    #[error("{0}")]
    Validation(String),
    /// 当前状态不允许该操作
    #[error("当前状态 {state} 不允许执行 {operation}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置项取值不合法
    #[error("配置项 {field} 无效: {reason}")]
    Invalid { field: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl ApiError {
    /// 创建网络请求失败错误
    pub fn network(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::NetworkFailure {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建响应格式错误
    pub fn malformed(reason: impl Into<String>) -> Self {
        ApiError::MalformedPayload {
            reason: reason.into(),
        }
    }

    /// HTTP 状态码（仅 HttpError 有）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl WizardError {
    pub fn invalid_transition(operation: &'static str, state: &'static str) -> Self {
        WizardError::InvalidTransition { operation, state }
    }
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_carries_status() {
        let err = ApiError::HttpError {
            endpoint: "/generate-question".to_string(),
            status: 500,
            body: String::new(),
        };
        assert!(err.to_string().contains("500"));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn wrapped_errors_keep_inner_message() {
        let err: AppError = ApiError::malformed("缺少 question 字段").into();
        assert!(err.to_string().contains("缺少 question 字段"));

        let err: AppError = WizardError::invalid_transition("start", "Loading").into();
        assert!(err.to_string().contains("start"));
    }
}
