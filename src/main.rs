//! # 图片压缩复制工具 — 可执行入口
//!
//! 本文件仅负责日志初始化与一次完整工作流的驱动。
//! 业务逻辑全部在库侧，详见 `lib.rs` 架构文档。

use compress_clipboard::config::WorkflowConfig;
use compress_clipboard::workflow::CompressionWorkflow;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut workflow = CompressionWorkflow::with_system_adapters(WorkflowConfig::default());

    if let Err(err) = workflow.run_workflow().await {
        log::error!("工作流终止 - code={} message={}", err.code(), err);
        std::process::exit(1);
    }

    let state = workflow.state();
    if let (Some(original), Some(compressed)) = (&state.original, &state.compressed) {
        log::info!(
            "📦 原始 {} bytes -> 压缩 {} bytes（缩减 {}%）",
            original.byte_size,
            compressed.byte_size,
            state.reduction_percentage()
        );
    }

    if let Err(err) = workflow.copy_payload().await {
        log::error!("复制失败 - code={} message={}", err.code(), err);
        std::process::exit(1);
    }
}
