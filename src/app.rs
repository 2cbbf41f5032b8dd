use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::clients::AssessmentClient;
use crate::config::Config;
use crate::error::WizardError;
use crate::services::{ResultWriter, TerminalPrompt, TerminalRenderer};
use crate::utils::logging::{log_session_summary, log_startup};
use crate::workflow::{QuestionWizard, WizardSettings, WizardState};

/// 应用主结构
pub struct App {
    config: Config,
    client: AssessmentClient,
    result_writer: Option<ResultWriter>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let client = AssessmentClient::new(&config).context("无法创建服务端客户端")?;
        let result_writer = config.result_log_file.as_deref().map(ResultWriter::with_path);
        if let Some(writer) = &result_writer {
            info!("📝 评估结果将记录到: {}", writer.path());
        }

        Ok(Self {
            config,
            client,
            result_writer,
        })
    }

    /// 运行交互式问卷，直到用户退出
    pub async fn run(self) -> Result<()> {
        let App {
            config,
            client,
            result_writer,
        } = self;

        info!("🌐 连接服务端: {}", client.base_url());

        let prompt = TerminalPrompt::new();
        let mut wizard = QuestionWizard::new(
            client,
            TerminalRenderer::new(),
            WizardSettings::from(&config),
        );

        loop {
            // 每个操作都会等请求结束再返回，这里不应看到进行中的状态
            if wizard.state().is_busy() {
                bail!("流程意外停在 {} 状态", wizard.state().name());
            }

            match wizard.state() {
                WizardState::Welcome => {
                    if !prompt.confirm_start()? {
                        break;
                    }
                    wizard.start().await?;
                }
                WizardState::AwaitingAnswer(question) => {
                    let answer = prompt.choose_answer(question)?;
                    match wizard.submit_answer(answer.as_deref()).await {
                        // 校验失败时提示已由渲染器展示，重新选择即可
                        Ok(()) | Err(WizardError::Validation(_)) => {}
                        Err(e) => return Err(e.into()),
                    }
                }
                WizardState::Error(error) => {
                    if error.retry.is_none() || !prompt.confirm_retry()? {
                        break;
                    }
                    wizard.retry().await?;
                }
                WizardState::ShowingResults(result) => {
                    log_session_summary(wizard.session(), result);
                    if let Some(writer) = &result_writer {
                        if let Err(e) = writer.write(wizard.session(), result).await {
                            warn!("⚠️ 评估结果写入失败: {}", e);
                        }
                    }
                    if !prompt.confirm_restart()? {
                        break;
                    }
                    wizard.restart();
                }
                WizardState::Loading | WizardState::Submitting => {}
            }
        }

        info!("👋 问卷结束 (会话 {})", wizard.session().session_id());
        Ok(())
    }
}
