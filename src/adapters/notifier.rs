//! # 用户提示适配器
//!
//! 复制成功等提示属于 fire-and-forget 的用户反馈通道。
//! 库形态下落到结构化日志；嵌入 GUI 时替换为弹窗实现即可。

use super::Notifier;

/// 基于日志的提示实现。
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        log::info!("🔔 {} - {}", title, message);
    }
}
