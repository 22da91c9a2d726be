//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `CompressionWorkflow` 只负责流程编排与状态管理，不直接触碰平台 API。
//! 处理链路固定为：
//! 1. 调用选择器取得单个资源（或取消信号）
//! 2. 选中即提交原图 URI 与体积
//! 3. 按固定参数压缩，得到产物 URI
//! 4. stat 产物体积
//! 5. 按产物后缀判定 MIME，读取字节并编码 data URI
//! 6. 提交压缩结果与编码载荷
//!
//! ## 实现思路
//!
//! - 各阶段通过 `?` 串联，首个失败即短路；任何失败（取消 / 未选择 /
//!   适配器异常）都写入 `error_message`，没有只打日志的静默路径。
//! - `loading` 在每条退出路径上无条件复位。
//! - `run_workflow(&mut self)` 的独占借用使并发重入在类型层面不可表达，
//!   无需额外锁；重复顺序调用整体覆盖上一次结果。
//! - 记录 `pick/compress/stat/encode/total` 阶段耗时，便于性能诊断。
//! - "选中后失败保留原图信息"是有意保留的行为：压缩失败时用户仍能
//!   看到已选原图与体积，错误文案同时可见。

use std::sync::Arc;
use std::time::Instant;

use crate::adapters::{
    ClipboardWriter, CompressOptions, DialogMediaPicker, FileStore, ImageCompressor,
    LocalFileStore, LocalImageCompressor, LogNotifier, MediaPicker, Notifier, PickOutcome,
    PickRequest, SystemClipboard,
};
use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::state::{
    CompressionResult, EncodedPayload, SelectionResult, WorkflowState, build_data_uri,
    mime_for_uri,
};

/// 压缩工作流控制器。
///
/// 独占持有状态与全部适配器；一个屏幕会话对应一个实例。
pub struct CompressionWorkflow {
    config: WorkflowConfig,
    picker: Box<dyn MediaPicker>,
    compressor: Box<dyn ImageCompressor>,
    files: Box<dyn FileStore>,
    clipboard: Arc<dyn ClipboardWriter>,
    notifier: Box<dyn Notifier>,
    state: WorkflowState,
}

impl CompressionWorkflow {
    /// 按注入的适配器组装控制器（测试与定制场景）。
    pub fn new(
        config: WorkflowConfig,
        picker: Box<dyn MediaPicker>,
        compressor: Box<dyn ImageCompressor>,
        files: Box<dyn FileStore>,
        clipboard: Arc<dyn ClipboardWriter>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            picker,
            compressor,
            files,
            clipboard,
            notifier,
            state: WorkflowState::default(),
        }
    }

    /// 使用生产适配器组装控制器。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use compress_clipboard::config::WorkflowConfig;
    /// use compress_clipboard::workflow::CompressionWorkflow;
    ///
    /// let workflow = CompressionWorkflow::with_system_adapters(WorkflowConfig::default());
    /// ```
    pub fn with_system_adapters(config: WorkflowConfig) -> Self {
        Self::new(
            config,
            Box::new(DialogMediaPicker::new()),
            Box::new(LocalImageCompressor::new()),
            Box::new(LocalFileStore::new()),
            Arc::new(SystemClipboard::new()),
            Box::new(LogNotifier::new()),
        )
    }

    /// 当前状态快照（只读）。
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// 执行一次完整工作流：选择 → 压缩 → stat → 编码。
    ///
    /// 结果同时写入状态与返回值：状态供 UI 渲染，返回值供调用侧链式
    /// 处理。任何失败都会落到 `state.error_message`。
    pub async fn run_workflow(&mut self) -> Result<(), WorkflowError> {
        self.state.begin_run();

        let result = self.execute_pipeline().await;

        match &result {
            Ok(()) => self.state.finish_run(None),
            Err(err) => {
                log::warn!("❌ 压缩工作流失败 - code={} message={}", err.code(), err);
                self.state.finish_run(Some(err.user_message()));
            }
        }

        result
    }

    async fn execute_pipeline(&mut self) -> Result<(), WorkflowError> {
        let total_start = Instant::now();

        let pick_start = Instant::now();
        let request = PickRequest {
            quality_hint: self.config.picker_quality_hint,
            selection_limit: 1,
        };
        let asset = match self.picker.pick_photo(&request)? {
            PickOutcome::Cancelled => return Err(WorkflowError::Cancelled),
            PickOutcome::Empty => return Err(WorkflowError::NoSelection),
            PickOutcome::Selected(asset) => asset,
        };
        let pick_elapsed = pick_start.elapsed();

        // 选中即提交原图信息并清空上一次的产物；
        // 取消/未选择路径不会走到这里，不触碰已有图片状态。
        self.state.original = Some(SelectionResult {
            uri: asset.uri.clone(),
            byte_size: asset.file_size.unwrap_or(0),
        });
        self.state.compressed = None;
        self.state.payload = None;

        let compress_start = Instant::now();
        let options = CompressOptions::from_config(&self.config);
        let compressed_uri = self.compressor.compress(&asset.uri, &options)?;
        let compress_elapsed = compress_start.elapsed();

        let stat_start = Instant::now();
        let compressed_size = self.files.stat_size(&compressed_uri)?;
        let stat_elapsed = stat_start.elapsed();

        let encode_start = Instant::now();
        let mime_type = mime_for_uri(&compressed_uri);
        let base64_data = self.files.read_base64(&compressed_uri)?;
        let payload = EncodedPayload {
            mime_type,
            data_uri: build_data_uri(mime_type, &base64_data),
        };
        let encode_elapsed = encode_start.elapsed();

        self.state.compressed = Some(CompressionResult {
            uri: compressed_uri,
            byte_size: compressed_size,
        });
        self.state.payload = Some(payload);

        log::info!(
            "✅ 压缩工作流完成 - pick={}ms compress={}ms stat={}ms encode={}ms total={}ms 缩减={}%",
            pick_elapsed.as_millis(),
            compress_elapsed.as_millis(),
            stat_elapsed.as_millis(),
            encode_elapsed.as_millis(),
            total_start.elapsed().as_millis(),
            self.state.reduction_percentage()
        );

        Ok(())
    }

    /// 将编码载荷复制到系统剪贴板，并触发成功提示。
    ///
    /// 刻意不校验载荷是否存在：无载荷时复制空字符串，与调用语义保持
    /// 一致。写入放到阻塞线程执行，避免占用 async 运行时。
    pub async fn copy_payload(&self) -> Result<(), WorkflowError> {
        let text = self
            .state
            .payload
            .as_ref()
            .map(|payload| payload.data_uri.clone())
            .unwrap_or_default();

        let clipboard = Arc::clone(&self.clipboard);
        tokio::task::spawn_blocking(move || clipboard.set_text(&text))
            .await
            .map_err(|e| WorkflowError::Clipboard(format!("线程执行失败：{}", e)))??;

        self.notifier.notify("复制成功", "Base64 数据已复制到剪贴板");
        Ok(())
    }
}
