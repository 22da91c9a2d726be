//! # 文件元数据与读取适配器
//!
//! ## 设计思路
//!
//! 对压缩产物只需要两件事：stat 字节数、读出内容并编码 base64。
//! 统一在这里做存在性与可读性检查，错误都映射到 `FileSystem` 分支。

use base64::{Engine as _, engine::general_purpose};
use std::path::Path;

use super::FileStore;
use crate::error::WorkflowError;

/// 本地文件系统实现。
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore for LocalFileStore {
    fn stat_size(&self, uri: &str) -> Result<u64, WorkflowError> {
        let path = Path::new(uri);
        if !path.exists() {
            return Err(WorkflowError::FileSystem(format!("文件不存在：{}", uri)));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| WorkflowError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        Ok(metadata.len())
    }

    fn read_base64(&self, uri: &str) -> Result<String, WorkflowError> {
        let bytes = std::fs::read(uri)
            .map_err(|e| WorkflowError::FileSystem(format!("无法读取文件内容：{}", e)))?;

        Ok(general_purpose::STANDARD.encode(&bytes))
    }
}
