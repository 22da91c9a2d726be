//! # 图片压缩适配器
//!
//! ## 设计思路
//!
//! 压缩链路固定为"读取 → 签名校验 → 解码 → 等比降采样 → 重编码 → 落盘"。
//! 先做文件签名校验再完整解码，尽早拒绝非图片输入。
//! 输出格式按源 URI 后缀自动决定：`.png` 保持 PNG，其余统一转 JPEG，
//! 与下游 MIME 判定规则保持同一套命名约定。
//!
//! ## 实现思路
//!
//! 1. `infer` 校验 magic bytes
//! 2. `image` 完整解码
//! 3. 超出 1024×1024 时按比例缩小（只缩不放大）
//! 4. 优先 `fast_image_resize`，失败回退 `image::resize_exact`
//! 5. PNG 走无损编码，JPEG 按质量档位编码
//! 6. 产物写入输出目录，文件名带时间戳避免覆盖

use fast_image_resize as fr;
use image::{DynamicImage, GenericImageView, ImageBuffer, ImageFormat, Rgba};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use super::ImageCompressor;
use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::state::mime_for_uri;

/// 单次压缩的参数快照。
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// 输出最大宽度（像素）。
    pub max_width: u32,
    /// 输出最大高度（像素）。
    pub max_height: u32,
    /// JPEG 编码质量（1..=100）。
    pub quality: u8,
    /// 降采样滤镜策略。
    pub resize_filter: image::imageops::FilterType,
    /// 产物输出目录。
    pub output_dir: PathBuf,
}

impl CompressOptions {
    /// 从工作流配置提取压缩参数快照。
    pub fn from_config(config: &WorkflowConfig) -> Self {
        Self {
            max_width: config.max_width,
            max_height: config.max_height,
            quality: config.encoder_quality(),
            resize_filter: config.resize_filter,
            output_dir: config.artifact_dir(),
        }
    }
}

/// 本地图片压缩器。
pub struct LocalImageCompressor;

impl LocalImageCompressor {
    pub fn new() -> Self {
        Self
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), WorkflowError> {
        if bytes.is_empty() {
            return Err(WorkflowError::Compress("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| WorkflowError::Compress("无法识别图片类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(WorkflowError::Compress(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(())
    }

    /// 按上限计算等比缩放后的目标尺寸；不超限时返回 `None`（不放大）。
    fn fit_within_bounds(
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    ) -> Option<(u32, u32)> {
        if width <= max_width && height <= max_height {
            return None;
        }

        let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
        let target_width = ((width as f64 * scale).floor() as u32).max(1);
        let target_height = ((height as f64 * scale).floor() as u32).max(1);

        Some((target_width, target_height))
    }

    /// 执行等比降采样。
    ///
    /// 优先走 `fast_image_resize`，失败时回退 `image::resize_exact`。
    fn downscale(
        image: DynamicImage,
        options: &CompressOptions,
    ) -> Result<DynamicImage, WorkflowError> {
        let (width, height) = image.dimensions();

        let Some((target_width, target_height)) =
            Self::fit_within_bounds(width, height, options.max_width, options.max_height)
        else {
            return Ok(image);
        };

        log::info!(
            "🧩 等比降采样：{}x{} -> {}x{}（filter={:?}）",
            width,
            height,
            target_width,
            target_height,
            options.resize_filter
        );

        match Self::resize_with_fast_image_resize(
            &image,
            target_width,
            target_height,
            options.resize_filter,
        ) {
            Ok(resized) => Ok(resized),
            Err(err) => {
                log::warn!(
                    "⚠️ fast_image_resize 降采样失败，回退 image::resize_exact：{}",
                    err
                );
                Ok(image.resize_exact(target_width, target_height, options.resize_filter))
            }
        }
    }

    fn resize_with_fast_image_resize(
        image: &DynamicImage,
        target_width: u32,
        target_height: u32,
        filter: image::imageops::FilterType,
    ) -> Result<DynamicImage, WorkflowError> {
        let src = image.to_rgba8();
        let (src_width, src_height) = src.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            src_width,
            src_height,
            src.into_raw(),
            fr::PixelType::U8x4,
        )
        .map_err(|e| WorkflowError::Compress(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(
            Self::to_fast_filter(filter),
        ));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| WorkflowError::Compress(format!("fast_image_resize 执行失败：{}", e)))?;

        let rgba = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(
            target_width,
            target_height,
            dst_image.into_vec(),
        )
        .ok_or_else(|| WorkflowError::Compress("fast_image_resize 输出缓冲长度异常".to_string()))?;

        Ok(DynamicImage::ImageRgba8(rgba))
    }

    fn to_fast_filter(filter: image::imageops::FilterType) -> fr::FilterType {
        match filter {
            image::imageops::FilterType::Nearest => fr::FilterType::Box,
            image::imageops::FilterType::Triangle => fr::FilterType::Bilinear,
            image::imageops::FilterType::CatmullRom => fr::FilterType::CatmullRom,
            image::imageops::FilterType::Gaussian => fr::FilterType::Mitchell,
            image::imageops::FilterType::Lanczos3 => fr::FilterType::Lanczos3,
        }
    }

    /// 产物输出路径：时间戳命名，扩展名与输出格式一致。
    fn artifact_path(output_dir: &Path, extension: &str) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f");
        output_dir.join(format!("compressed_{}.{}", stamp, extension))
    }

    /// 将图像编码写入产物文件。
    fn encode_to_file(
        image: &DynamicImage,
        path: &Path,
        as_png: bool,
        quality: u8,
    ) -> Result<(), WorkflowError> {
        let file = File::create(path)
            .map_err(|e| WorkflowError::FileSystem(format!("无法创建产物文件：{}", e)))?;
        let mut writer = BufWriter::new(file);

        if as_png {
            image
                .write_to(&mut writer, ImageFormat::Png)
                .map_err(|e| WorkflowError::Compress(format!("PNG 编码失败：{}", e)))?;
        } else {
            let rgb = image.to_rgb8();
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality);
            encoder
                .encode(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| WorkflowError::Compress(format!("JPEG 编码失败：{}", e)))?;
        }

        Ok(())
    }
}

impl Default for LocalImageCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCompressor for LocalImageCompressor {
    fn compress(&self, source_uri: &str, options: &CompressOptions) -> Result<String, WorkflowError> {
        log::info!("🗜️ 开始压缩图片 - source={}", source_uri);

        let bytes = std::fs::read(source_uri)
            .map_err(|e| WorkflowError::FileSystem(format!("无法读取源图片：{}", e)))?;
        Self::validate_image_signature(&bytes)?;

        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| WorkflowError::Compress(format!("图片解码失败：{}", e)))?;
        let (raw_width, raw_height) = decoded.dimensions();

        let optimized = Self::downscale(decoded, options)?;
        let (width, height) = optimized.dimensions();

        // 输出格式与 MIME 判定共用同一条后缀规则
        let as_png = mime_for_uri(source_uri) == "image/png";
        let extension = if as_png { "png" } else { "jpg" };
        let output_path = Self::artifact_path(&options.output_dir, extension);

        Self::encode_to_file(&optimized, &output_path, as_png, options.quality)?;

        log::info!(
            "✅ 压缩完成 - 原始尺寸: {}x{} 输出尺寸: {}x{} 产物: {}",
            raw_width,
            raw_height,
            width,
            height,
            output_path.display()
        );

        Ok(output_path.to_string_lossy().to_string())
    }
}
