//! # 配置模块
//!
//! ## 设计思路
//!
//! 将压缩链路的全部固定参数集中到 `WorkflowConfig`，保证运行时行为
//! 可观测、可测试。产品语义上这些参数是固定常量（1024×1024、质量 0.8），
//! 配置结构只是让二进制入口与测试共享同一份取值，不是对外的策略开关。
//!
//! ## 实现思路
//!
//! - `Default` 即产品行为，测试按需覆盖个别字段。
//! - `encoder_quality()` 负责 `0.0..=1.0` 到编码器 `1..=100` 的换算。

use image::imageops::FilterType;
use std::path::PathBuf;

/// 压缩工作流配置。
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// 传给选择器的质量提示（0.0 ~ 1.0）。
    pub picker_quality_hint: f32,
    /// 压缩输出的最大宽度（像素）。
    pub max_width: u32,
    /// 压缩输出的最大高度（像素）。
    pub max_height: u32,
    /// 有损编码质量（0.0 ~ 1.0）。
    pub quality: f32,
    /// 降采样滤镜策略。
    pub resize_filter: FilterType,
    /// 压缩产物输出目录；`None` 时使用系统临时目录。
    pub output_dir: Option<PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            picker_quality_hint: 0.8,
            max_width: 1024,
            max_height: 1024,
            quality: 0.8,
            resize_filter: FilterType::Triangle,
            output_dir: None,
        }
    }
}

impl WorkflowConfig {
    /// 将 `quality` 换算为编码器使用的 `1..=100` 整数档位。
    pub(crate) fn encoder_quality(&self) -> u8 {
        let scaled = (self.quality * 100.0).round();
        scaled.clamp(1.0, 100.0) as u8
    }

    /// 压缩产物落盘目录。
    pub(crate) fn artifact_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}
