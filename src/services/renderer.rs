//! 渲染能力 - 业务能力层
//!
//! 流程层通过这个接口产生界面效果，自身不依赖任何展示层

use std::time::Duration;

use async_trait::async_trait;

use crate::models::Session;
use crate::workflow::WizardState;

/// 渲染能力
///
/// 每次状态切换后控制器都会调用 `render`
#[async_trait]
pub trait Renderer: Send {
    /// 按状态刷新界面（显示/隐藏区域、题目、进度、结果）
    fn render(&mut self, state: &WizardState, session: &Session);

    /// 网络请求进行中时显示加载指示，并禁用触发操作
    fn show_loading(&mut self, loading: bool);

    /// 显示一条提示；`display_for` 为 `Some` 时到期自动消失
    ///
    /// 调用方会等待返回，实现可以在提示消失后再返回
    async fn show_error(&mut self, message: &str, display_for: Option<Duration>);
}
