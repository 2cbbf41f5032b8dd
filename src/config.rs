use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};

/// 环境变量前缀
const ENV_PREFIX: &str = "RISK_WIZARD_";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 服务端地址
    pub base_url: String,
    /// 题目生成接口路径
    pub question_endpoint: String,
    /// 风险评估接口路径
    pub assess_endpoint: String,
    /// 默认题目总数（服务端未返回 total_questions 时使用）
    pub default_total_questions: usize,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 校验提示的显示时长（毫秒）
    pub validation_display_ms: u64,
    /// 提交失败后是否允许重试
    pub allow_submit_retry: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 评估结果日志文件（为空则不写）
    pub result_log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            question_endpoint: "/generate-question".to_string(),
            assess_endpoint: "/api/assess-risk".to_string(),
            default_total_questions: 10,
            request_timeout_secs: 30,
            validation_display_ms: 3000,
            allow_submit_retry: true,
            verbose_logging: false,
            result_log_file: None,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（可选）→ 环境变量 → 校验
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::TomlParse { source, .. } => ConfigError::TomlParse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParse {
            path: String::new(),
            source,
        })
    }

    /// 用环境变量覆盖配置
    ///
    /// `lookup` 按完整变量名取值，便于测试时替换真实环境
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = var("BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = var("QUESTION_ENDPOINT") {
            self.question_endpoint = v;
        }
        if let Some(v) = var("ASSESS_ENDPOINT") {
            self.assess_endpoint = v;
        }
        if let Some(v) = var("TOTAL_QUESTIONS") {
            self.default_total_questions = parse_env("TOTAL_QUESTIONS", &v, "usize")?;
        }
        if let Some(v) = var("TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("TIMEOUT_SECS", &v, "u64")?;
        }
        if let Some(v) = var("VALIDATION_DISPLAY_MS") {
            self.validation_display_ms = parse_env("VALIDATION_DISPLAY_MS", &v, "u64")?;
        }
        if let Some(v) = var("ALLOW_SUBMIT_RETRY") {
            self.allow_submit_retry = parse_env("ALLOW_SUBMIT_RETRY", &v, "bool")?;
        }
        if let Some(v) = var("VERBOSE") {
            self.verbose_logging = parse_env("VERBOSE", &v, "bool")?;
        }
        if let Some(v) = var("RESULT_LOG") {
            self.result_log_file = Some(v).filter(|p| !p.trim().is_empty());
        }
        Ok(())
    }

    /// 校验配置项
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "base_url",
                format!("必须以 http:// 或 https:// 开头: {}", self.base_url),
            ));
        }
        for (field, endpoint) in [
            ("question_endpoint", &self.question_endpoint),
            ("assess_endpoint", &self.assess_endpoint),
        ] {
            if !endpoint.starts_with('/') {
                return Err(ConfigError::invalid(field, "接口路径必须以 / 开头"));
            }
        }
        if self.default_total_questions == 0 {
            return Err(ConfigError::invalid("default_total_questions", "至少为 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("request_timeout_secs", "至少为 1"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validation_display(&self) -> Duration {
        Duration::from_millis(self.validation_display_ms)
    }
}

fn parse_env<T: std::str::FromStr>(
    name: &str,
    value: &str,
    expected_type: &str,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: format!("{ENV_PREFIX}{name}"),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_total_questions, 10);
        assert_eq!(config.validation_display(), Duration::from_secs(3));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            base_url = "https://risk.example.com"
            default_total_questions = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://risk.example.com");
        assert_eq!(config.default_total_questions, 5);
        assert_eq!(config.question_endpoint, "/generate-question");
        assert!(config.allow_submit_retry);
    }

    #[test]
    fn toml_file_errors_name_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_total_questions = \"ten\"").unwrap();

        let err = Config::from_toml_file(file.path()).unwrap_err();
        match err {
            ConfigError::TomlParse { path, .. } => {
                assert_eq!(path, file.path().display().to_string())
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn env_overrides_apply_and_reject_bad_values() {
        let vars: HashMap<&str, &str> = [
            ("RISK_WIZARD_BASE_URL", "http://10.0.0.2:8080"),
            ("RISK_WIZARD_TOTAL_QUESTIONS", "7"),
            ("RISK_WIZARD_ALLOW_SUBMIT_RETRY", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.default_total_questions, 7);
        assert!(!config.allow_submit_retry);

        let err = Config::default()
            .apply_env_overrides(|k| (k == "RISK_WIZARD_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { .. }));
    }

    #[test]
    fn validate_rejects_zero_questions_and_bad_url() {
        let config = Config {
            default_total_questions: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            base_url: "localhost:5000".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
