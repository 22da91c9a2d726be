//! # 剪贴板写入适配器
//!
//! ## 设计思路
//!
//! 与操作系统剪贴板的交互独立成适配器，隔离平台不稳定因素。
//! 其他进程短暂占用剪贴板会导致瞬时失败，因此写入带有限次数的
//! 指数退避重试（含抖动，避免与占用方节奏共振）。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::ClipboardWriter;
use crate::error::WorkflowError;

const WRITE_RETRY_MAX_ATTEMPTS: u32 = 3;
const WRITE_RETRY_BASE_DELAY_MS: u64 = 100;
const WRITE_RETRY_MAX_DELAY_MS: u64 = 900;

static JITTER_STATE: AtomicU64 = AtomicU64::new(0);

fn seed_jitter_state() -> u64 {
    let time_seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mut state = time_seed ^ ((std::process::id() as u64) << 32) ^ 0x9E37_79B9_7F4A_7C15;
    if state == 0 {
        state = 0xA5A5_5A5A_0123_4567;
    }
    state
}

fn next_jitter_u64() -> u64 {
    let mut current = JITTER_STATE.load(Ordering::Relaxed);

    loop {
        let seeded = if current == 0 {
            seed_jitter_state()
        } else {
            current
        };

        let mut next = seeded;
        next ^= next << 13;
        next ^= next >> 7;
        next ^= next << 17;

        match JITTER_STATE.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => current = observed,
        }
    }
}

fn compute_backoff_delay_with_jitter(base_delay_ms: u64, attempt: u32, max_delay_ms: u64) -> u64 {
    let exp = base_delay_ms.saturating_mul(1_u64 << attempt.saturating_sub(1).min(8));
    let capped = exp.min(max_delay_ms.max(base_delay_ms));
    let jitter_bound = (capped / 3).max(1);
    let jitter = next_jitter_u64() % (jitter_bound + 1);
    capped.saturating_add(jitter)
}

/// 基于 `arboard` 的系统剪贴板实现。
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), WorkflowError> {
        let mut last_error = None;

        for attempt in 1..=WRITE_RETRY_MAX_ATTEMPTS {
            if attempt > 1 {
                let wait_ms = compute_backoff_delay_with_jitter(
                    WRITE_RETRY_BASE_DELAY_MS,
                    attempt - 1,
                    WRITE_RETRY_MAX_DELAY_MS,
                );
                log::debug!("🔄 剪贴板重试 {}/{}，等待 {}ms", attempt, WRITE_RETRY_MAX_ATTEMPTS, wait_ms);
                std::thread::sleep(Duration::from_millis(wait_ms));
            }

            let write_result = arboard::Clipboard::new()
                .map_err(|e| format!("无法访问剪贴板：{}", e))
                .and_then(|mut clipboard| {
                    clipboard
                        .set_text(text.to_string())
                        .map_err(|e| format!("写入失败：{}", e))
                });

            match write_result {
                Ok(()) => {
                    log::info!("✅ 剪贴板写入成功 ({} chars, 尝试 {})", text.len(), attempt);
                    return Ok(());
                }
                Err(message) => {
                    log::warn!("❌ 剪贴板写入尝试 {} 失败: {}", attempt, message);
                    last_error = Some(message);
                }
            }
        }

        Err(WorkflowError::Clipboard(
            last_error.unwrap_or_else(|| "未知错误".to_string()),
        ))
    }
}
