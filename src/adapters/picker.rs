//! # 媒体选择适配器
//!
//! ## 设计思路
//!
//! 用系统文件对话框承担"平台媒体选择"职责。对话框关闭且无返回值时
//! 视为用户取消；选中后立即读取文件字节数作为原始体积，读不到时
//! 保持 `None`，由上层按 0 处理。
//!
//! 质量提示与单选限制属于选择器协议的一部分，桌面对话框用不上
//! 质量提示，仅记录日志保持行为可观测。

use std::path::PathBuf;

use super::{MediaPicker, PickOutcome, PickRequest, SelectedAsset};
use crate::error::WorkflowError;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "bmp"];

/// 基于系统文件对话框的选择器实现。
pub struct DialogMediaPicker;

impl DialogMediaPicker {
    pub fn new() -> Self {
        Self
    }

    fn file_size_of(path: &PathBuf) -> Option<u64> {
        std::fs::metadata(path).ok().map(|meta| meta.len())
    }
}

impl Default for DialogMediaPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaPicker for DialogMediaPicker {
    fn pick_photo(&self, request: &PickRequest) -> Result<PickOutcome, WorkflowError> {
        log::info!(
            "🖼️ 打开图片选择器 - limit={} quality_hint={}",
            request.selection_limit,
            request.quality_hint
        );

        let picked = rfd::FileDialog::new()
            .set_title("选择要压缩的图片")
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file();

        let Some(path) = picked else {
            log::info!("🚫 用户取消了图片选择");
            return Ok(PickOutcome::Cancelled);
        };

        let file_size = Self::file_size_of(&path);
        let uri = path.to_string_lossy().to_string();

        if uri.is_empty() {
            return Ok(PickOutcome::Empty);
        }

        log::info!(
            "✅ 已选中图片 - path={} size={:?}",
            uri,
            file_size
        );

        Ok(PickOutcome::Selected(SelectedAsset { uri, file_size }))
    }
}
