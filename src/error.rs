//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载压缩链路中的所有失败来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 三类语义必须可区分：用户取消、未选择图片、适配器执行失败。
//! 三者统一走同一条错误上报通道，最终都会写入 `WorkflowState::error_message`，
//! 不允许"只打日志不提示"的静默失败路径。

/// 压缩工作流统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// 用户在选择器中主动取消。
    #[error("Image selection cancelled")]
    Cancelled,

    /// 选择器正常返回但没有任何资源。
    #[error("No image selected")]
    NoSelection,

    #[error("选择器错误：{0}")]
    Picker(String),

    #[error("压缩错误：{0}")]
    Compress(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("剪贴板错误：{0}")]
    Clipboard(String),
}

impl WorkflowError {
    /// 写入状态的用户可见文案。
    ///
    /// `Cancelled` / `NoSelection` 是固定 UI 文案，其余分支直接复用
    /// `Display` 输出，保证错误通道对三类失败一视同仁。
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// 错误码，用于日志检索与前端分支匹配。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cancelled => "E_CANCELLED",
            Self::NoSelection => "E_NO_SELECTION",
            Self::Picker(_) => "E_PICKER",
            Self::Compress(_) => "E_COMPRESS",
            Self::FileSystem(_) => "E_FILESYSTEM",
            Self::Clipboard(_) => "E_CLIPBOARD",
        }
    }
}

impl From<WorkflowError> for String {
    /// 兼容部分仍使用字符串错误的调用点。
    fn from(error: WorkflowError) -> Self {
        error.to_string()
    }
}
