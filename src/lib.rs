//! # Risk Wizard
//!
//! 投资风险评估问卷客户端：逐题向服务端请求题目，收集单选答案，
//! 最后提交全部答案并展示风险画像与评分
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP Client），只暴露能力
//! - `HttpExecutor` - 唯一的 client owner，提供 post() 能力
//!
//! ### ② 服务端客户端（Clients）
//! - `clients/` - `AssessmentBackend` 描述两个远程接口（题目生成、风险评估）
//! - `AssessmentClient` - 基于 HttpExecutor 的实现
//!
//! ### ③ 业务能力层（Services）
//! - `Renderer` - 渲染能力，流程层只通过它产生界面效果
//! - `TerminalRenderer` / `TerminalPrompt` - 终端界面
//! - `ResultWriter` - 写评估记录能力
//!
//! ### ④ 流程层（Workflow）
//! - `WizardState` - 流程状态
//! - `QuestionWizard` - 流程编排（start → 逐题作答 → 提交 → 结果）
//!
//! ### ⑤ 编排层（App）
//! - `App` - 组装配置、客户端与终端，驱动用户交互循环
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{AssessmentBackend, AssessmentClient};
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, WizardError};
pub use models::{AssessmentResult, Question, Session};
pub use services::Renderer;
pub use workflow::{QuestionWizard, WizardSettings, WizardState};
