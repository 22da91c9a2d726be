//! # 图片压缩复制工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              调用方（二进制入口 / GUI 宿主）            │
//! └───────┬──────────────────────────────────────────────┘
//!         ↕ run_workflow() / copy_payload() / state()
//! ┌───────┼──────────────────────────────────────────────┐
//! │       ↕        workflow（编排 + 状态独占持有）          │
//! │                                                      │
//! │  ┌─ error ────── WorkflowError（统一错误类型）          │
//! │  ├─ config ───── 固定压缩参数（1024×1024 / 0.8）        │
//! │  ├─ state ────── 运行结果聚合 + 缩减百分比 + MIME 判定   │
//! │  └─ adapters ── 外部协作方 trait 接口                   │
//! │      ├─ picker        系统文件对话框选图                │
//! │      ├─ compressor    解码·降采样·重编码·落盘           │
//! │      ├─ filesystem    stat + base64 读取               │
//! │      ├─ clipboard     arboard 写入（含重试）            │
//! │      └─ notifier      复制成功提示                     │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `WorkflowError`，取消/未选择/适配器失败同通道上报 |
//! | [`config`] | 固定压缩常量的单一来源 |
//! | [`state`] | 单次运行状态、体积缩减百分比、URI 后缀 MIME 判定 |
//! | [`adapters`] | 选择器、压缩器、文件、剪贴板、提示的 trait 与生产实现 |
//! | [`workflow`] | `CompressionWorkflow`：选择 → 压缩 → stat → 编码 → 复制 |

pub mod adapters;
pub mod config;
pub mod error;
pub mod state;
pub mod workflow;
