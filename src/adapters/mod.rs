//! # 外部适配器模块（adapters）
//!
//! ## 设计思路
//!
//! 工作流依赖的外部协作方全部收敛为 trait 接口，控制器只面向接口编排，
//! 平台实现与测试替身可以互换：
//!
//! - `MediaPicker`：平台媒体选择（返回单个资源或取消信号）
//! - `ImageCompressor`：按固定参数压缩，返回新产物 URI
//! - `FileStore`：对产物做 stat 与 base64 读取
//! - `ClipboardWriter`：写系统剪贴板
//! - `Notifier`：复制成功后的用户提示
//!
//! ## 实现思路
//!
//! 生产实现按职责分文件（picker / compressor / filesystem / clipboard /
//! notifier），均为"一个外部调用 + 少量胶水"，重逻辑只在压缩器中。

mod clipboard;
mod compressor;
mod filesystem;
mod notifier;
mod picker;

pub use clipboard::SystemClipboard;
pub use compressor::{CompressOptions, LocalImageCompressor};
pub use filesystem::LocalFileStore;
pub use notifier::LogNotifier;
pub use picker::DialogMediaPicker;

use crate::error::WorkflowError;

/// 选择器请求参数（固定：单张照片 + 质量提示）。
#[derive(Debug, Clone)]
pub struct PickRequest {
    /// 质量提示（0.0 ~ 1.0），透传给平台选择器。
    pub quality_hint: f32,
    /// 最多可选数量；本工作流恒为 1。
    pub selection_limit: u32,
}

/// 平台选择器返回的单个资源描述。
#[derive(Debug, Clone)]
pub struct SelectedAsset {
    /// 资源 URI（本地文件路径或平台内容地址）。
    pub uri: String,
    /// 平台报告的字节数；部分平台不提供。
    pub file_size: Option<u64>,
}

/// 选择阶段的三种出口。
#[derive(Debug, Clone)]
pub enum PickOutcome {
    /// 用户主动取消。
    Cancelled,
    /// 选择器返回成功但资源列表为空。
    Empty,
    /// 正常选中一个资源。
    Selected(SelectedAsset),
}

/// 平台媒体选择服务。
pub trait MediaPicker: Send + Sync {
    fn pick_photo(&self, request: &PickRequest) -> Result<PickOutcome, WorkflowError>;
}

/// 图片压缩服务：输入源 URI，输出压缩产物 URI。
pub trait ImageCompressor: Send + Sync {
    fn compress(&self, source_uri: &str, options: &CompressOptions) -> Result<String, WorkflowError>;
}

/// 文件元数据与内容读取服务。
pub trait FileStore: Send + Sync {
    /// 读取文件字节数。
    fn stat_size(&self, uri: &str) -> Result<u64, WorkflowError>;
    /// 读取文件内容并编码为 base64 字符串。
    fn read_base64(&self, uri: &str) -> Result<String, WorkflowError>;
}

/// 系统剪贴板写入服务。
pub trait ClipboardWriter: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), WorkflowError>;
}

/// 用户提示服务（fire-and-forget）。
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}
