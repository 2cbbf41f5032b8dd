//! 结果记录服务 - 业务能力层
//!
//! 只负责"把评估结果追加到日志文件"能力，不关心流程

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::AppResult;
use crate::models::{AssessmentResult, Session};

/// 结果记录服务
pub struct ResultWriter {
    path: String,
}

impl ResultWriter {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 追加一条评估记录
    pub async fn write(&self, session: &Session, result: &AssessmentResult) -> AppResult<()> {
        debug!("写入评估记录: 会话 {} → {}", session.session_id(), self.path);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let line = format!(
            "{} | 会话 {} | 风险画像 {} | 风险评分 {:.1} | 作答 {} 题\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            session.session_id(),
            result.risk_profile,
            result.risk_score,
            session.answered()
        );

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[tokio::test]
    async fn appends_one_line_per_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.log");
        let writer = ResultWriter::with_path(path.to_string_lossy());

        let mut session = Session::with_id("user_7", 1);
        session.record_answer("Agree");
        let result = AssessmentResult {
            risk_profile: "moderate".to_string(),
            risk_score: 75.0,
            detailed_responses: IndexMap::new(),
        };

        writer.write(&session, &result).await.unwrap();
        writer.write(&session, &result).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("会话 user_7"));
        assert!(lines[0].contains("风险评分 75.0"));
        assert!(lines[0].contains("作答 1 题"));
    }
}
