//! # 状态与数据模型模块
//!
//! ## 设计思路
//!
//! 将"单次运行产生的结果"建模为显式状态结构，由控制器独占持有，
//! 每次运行整体覆盖，不做跨会话持久化，也不引入进程级单例。
//!
//! - `SelectionResult`：原始选中图片（URI + 字节数）
//! - `CompressionResult`：压缩产物（URI + 字节数）
//! - `EncodedPayload`：MIME + data URI 字符串
//! - `WorkflowState`：以上三者 + loading / error_message 聚合
//!
//! ## 实现思路
//!
//! - 派生 `Serialize`，便于前端或日志侧直接消费状态快照。
//! - 体积缩减百分比是只读派生值，负数合法（压缩后变大时如实给出）。
//! - MIME 仅按 URI 后缀判定，不做内容嗅探。

use serde::Serialize;

/// 选择阶段输出：原始选中图片。
#[derive(Debug, Clone, Serialize)]
pub struct SelectionResult {
    /// 原始图片 URI。
    pub uri: String,
    /// 原始字节数（平台未提供时为 0）。
    pub byte_size: u64,
}

/// 压缩阶段输出：压缩产物及其体积。
#[derive(Debug, Clone, Serialize)]
pub struct CompressionResult {
    /// 压缩产物 URI。
    pub uri: String,
    /// 压缩后字节数。
    pub byte_size: u64,
}

/// 编码阶段输出：可直接粘贴使用的 data URI。
#[derive(Debug, Clone, Serialize)]
pub struct EncodedPayload {
    /// 按 URI 后缀判定的 MIME 类型。
    pub mime_type: &'static str,
    /// `data:<mime>;base64,<data>` 完整字符串。
    pub data_uri: String,
}

/// 工作流聚合状态。
///
/// 单屏会话内只有一个实例，每次 `run_workflow` 整体覆盖。
/// `loading = true` 期间的缩减百分比不应被当作最终值。
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowState {
    /// 当前运行选中的原始图片。
    pub original: Option<SelectionResult>,
    /// 当前运行的压缩产物。
    pub compressed: Option<CompressionResult>,
    /// 当前运行的编码结果。
    pub payload: Option<EncodedPayload>,
    /// 流水线是否执行中。
    pub loading: bool,
    /// 用户可见错误文案；`None` 表示无错误。
    pub error_message: Option<String>,
}

impl WorkflowState {
    /// 体积缩减百分比。
    ///
    /// `round((original - compressed) / original * 100)`；原始体积为 0 时
    /// 恒为 0（规避除零）。压缩后变大会得到负数，按原样返回，
    /// 是否展示由渲染侧决定。
    pub fn reduction_percentage(&self) -> i32 {
        let original = self.original.as_ref().map(|s| s.byte_size).unwrap_or(0);
        if original == 0 {
            return 0;
        }

        let compressed = self.compressed.as_ref().map(|c| c.byte_size).unwrap_or(0);
        let ratio = (original as f64 - compressed as f64) / original as f64;
        (ratio * 100.0).round() as i32
    }

    /// 清空上一次运行的结果与错误，进入加载中。
    pub(crate) fn begin_run(&mut self) {
        self.loading = true;
        self.error_message = None;
    }

    /// 结束一次运行；`loading` 无条件复位。
    pub(crate) fn finish_run(&mut self, error_message: Option<String>) {
        self.error_message = error_message;
        self.loading = false;
    }
}

/// 按 URI 后缀判定 MIME 类型。
///
/// `.png`（大小写不敏感）⇒ `image/png`，其余一律 `image/jpeg`。
/// 刻意不做内容嗅探，与压缩产物命名约定保持一致。
pub fn mime_for_uri(uri: &str) -> &'static str {
    if uri.to_ascii_lowercase().ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}

/// 拼接 data URI 字符串。
pub fn build_data_uri(mime_type: &str, base64_data: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_data)
}
