//! 工作流场景测试：用可编排的替身适配器驱动完整编排逻辑，
//! 覆盖取消、未选择、适配器失败、幸福路径、重复运行与复制动作。

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use compress_clipboard::adapters::{
    ClipboardWriter, CompressOptions, FileStore, ImageCompressor, MediaPicker, Notifier,
    PickOutcome, PickRequest, SelectedAsset,
};
use compress_clipboard::config::WorkflowConfig;
use compress_clipboard::error::WorkflowError;
use compress_clipboard::workflow::CompressionWorkflow;

// ────────────────────────────────────────────────────────────────────────
// 替身适配器
// ────────────────────────────────────────────────────────────────────────

/// 按预排脚本依次返回选择结果。
struct ScriptedPicker {
    outcomes: Mutex<VecDeque<PickOutcome>>,
    seen_requests: Mutex<Vec<PickRequest>>,
}

impl ScriptedPicker {
    fn new(outcomes: Vec<PickOutcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            seen_requests: Mutex::new(Vec::new()),
        })
    }
}

impl MediaPicker for ScriptedPicker {
    fn pick_photo(&self, request: &PickRequest) -> Result<PickOutcome, WorkflowError> {
        self.seen_requests
            .lock()
            .expect("request log lock poisoned")
            .push(request.clone());

        self.outcomes
            .lock()
            .expect("outcome script lock poisoned")
            .pop_front()
            .ok_or_else(|| WorkflowError::Picker("script exhausted".to_string()))
    }
}

/// 按脚本返回产物 URI，并记录收到的压缩参数。
struct ScriptedCompressor {
    outputs: Mutex<VecDeque<Result<String, WorkflowError>>>,
    seen_options: Mutex<Vec<CompressOptions>>,
}

impl ScriptedCompressor {
    fn new(outputs: Vec<Result<String, WorkflowError>>) -> Arc<Self> {
        Arc::new(Self {
            outputs: Mutex::new(outputs.into()),
            seen_options: Mutex::new(Vec::new()),
        })
    }
}

impl ImageCompressor for ScriptedCompressor {
    fn compress(&self, _source_uri: &str, options: &CompressOptions) -> Result<String, WorkflowError> {
        self.seen_options
            .lock()
            .expect("options log lock poisoned")
            .push(options.clone());

        self.outputs
            .lock()
            .expect("output script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(WorkflowError::Compress("script exhausted".to_string())))
    }
}

/// 固定返回体积与 base64 内容的文件替身。
struct ScriptedFileStore {
    sizes: Mutex<VecDeque<u64>>,
    payloads: Mutex<VecDeque<String>>,
}

impl ScriptedFileStore {
    fn new(sizes: Vec<u64>, payloads: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            sizes: Mutex::new(sizes.into()),
            payloads: Mutex::new(payloads.into()),
        })
    }
}

impl FileStore for ScriptedFileStore {
    fn stat_size(&self, _uri: &str) -> Result<u64, WorkflowError> {
        self.sizes
            .lock()
            .expect("size script lock poisoned")
            .pop_front()
            .ok_or_else(|| WorkflowError::FileSystem("size script exhausted".to_string()))
    }

    fn read_base64(&self, _uri: &str) -> Result<String, WorkflowError> {
        self.payloads
            .lock()
            .expect("payload script lock poisoned")
            .pop_front()
            .ok_or_else(|| WorkflowError::FileSystem("payload script exhausted".to_string()))
    }
}

/// 记录每次写入文本的剪贴板替身。
struct RecordingClipboard {
    texts: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            texts: Mutex::new(Vec::new()),
        })
    }

    fn last_text(&self) -> Option<String> {
        self.texts
            .lock()
            .expect("clipboard lock poisoned")
            .last()
            .cloned()
    }
}

impl ClipboardWriter for RecordingClipboard {
    fn set_text(&self, text: &str) -> Result<(), WorkflowError> {
        self.texts
            .lock()
            .expect("clipboard lock poisoned")
            .push(text.to_string());
        Ok(())
    }
}

/// 记录提示调用的替身。
struct RecordingNotifier {
    messages: Arc<Mutex<Vec<(String, String)>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.messages
            .lock()
            .expect("notifier lock poisoned")
            .push((title.to_string(), message.to_string()));
    }
}

struct TestHarness {
    workflow: CompressionWorkflow,
    clipboard: Arc<RecordingClipboard>,
    notifications: Arc<Mutex<Vec<(String, String)>>>,
}

fn build_workflow(
    picker: Arc<ScriptedPicker>,
    compressor: Arc<ScriptedCompressor>,
    files: Arc<ScriptedFileStore>,
) -> TestHarness {
    let clipboard = RecordingClipboard::new();
    let notifications = Arc::new(Mutex::new(Vec::new()));

    struct PickerHandle(Arc<ScriptedPicker>);
    impl MediaPicker for PickerHandle {
        fn pick_photo(&self, request: &PickRequest) -> Result<PickOutcome, WorkflowError> {
            self.0.pick_photo(request)
        }
    }

    struct CompressorHandle(Arc<ScriptedCompressor>);
    impl ImageCompressor for CompressorHandle {
        fn compress(&self, uri: &str, options: &CompressOptions) -> Result<String, WorkflowError> {
            self.0.compress(uri, options)
        }
    }

    struct FileHandle(Arc<ScriptedFileStore>);
    impl FileStore for FileHandle {
        fn stat_size(&self, uri: &str) -> Result<u64, WorkflowError> {
            self.0.stat_size(uri)
        }
        fn read_base64(&self, uri: &str) -> Result<String, WorkflowError> {
            self.0.read_base64(uri)
        }
    }

    let workflow = CompressionWorkflow::new(
        WorkflowConfig::default(),
        Box::new(PickerHandle(picker)),
        Box::new(CompressorHandle(compressor)),
        Box::new(FileHandle(files)),
        clipboard.clone(),
        Box::new(RecordingNotifier {
            messages: notifications.clone(),
        }),
    );

    TestHarness {
        workflow,
        clipboard,
        notifications,
    }
}

fn selected(uri: &str, file_size: Option<u64>) -> PickOutcome {
    PickOutcome::Selected(SelectedAsset {
        uri: uri.to_string(),
        file_size,
    })
}

// ────────────────────────────────────────────────────────────────────────
// 场景
// ────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn happy_path_literal_scenario() {
    let picker = ScriptedPicker::new(vec![selected("file://a.jpg", Some(500_000))]);
    let compressor = ScriptedCompressor::new(vec![Ok("file://b.jpg".to_string())]);
    let files = ScriptedFileStore::new(vec![200_000], vec!["AAAA".to_string()]);
    let mut harness = build_workflow(picker.clone(), compressor.clone(), files);

    harness
        .workflow
        .run_workflow()
        .await
        .expect("happy path should succeed");

    let state = harness.workflow.state();
    assert!(!state.loading);
    assert_eq!(state.error_message, None);

    let original = state.original.as_ref().expect("original should be set");
    assert_eq!(original.uri, "file://a.jpg");
    assert_eq!(original.byte_size, 500_000);

    let compressed = state.compressed.as_ref().expect("compressed should be set");
    assert_eq!(compressed.uri, "file://b.jpg");
    assert_eq!(compressed.byte_size, 200_000);

    let payload = state.payload.as_ref().expect("payload should be set");
    assert_eq!(payload.mime_type, "image/jpeg");
    assert_eq!(payload.data_uri, "data:image/jpeg;base64,AAAA");

    assert_eq!(state.reduction_percentage(), 60);

    // 压缩参数固定为产品常量
    let options = compressor.seen_options.lock().expect("options lock poisoned");
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].max_width, 1024);
    assert_eq!(options[0].max_height, 1024);
    assert_eq!(options[0].quality, 80);

    // 选择器请求固定为单选 + 0.8 质量提示
    let requests = picker.seen_requests.lock().expect("request lock poisoned");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].selection_limit, 1);
    assert!((requests[0].quality_hint - 0.8).abs() < f32::EPSILON);
}

#[tokio::test]
async fn cancellation_sets_error_without_touching_image_state() {
    let picker = ScriptedPicker::new(vec![PickOutcome::Cancelled]);
    let compressor = ScriptedCompressor::new(vec![]);
    let files = ScriptedFileStore::new(vec![], vec![]);
    let mut harness = build_workflow(picker, compressor, files);

    let result = harness.workflow.run_workflow().await;
    assert!(matches!(result, Err(WorkflowError::Cancelled)));

    let state = harness.workflow.state();
    assert!(!state.loading);
    assert_eq!(
        state.error_message.as_deref(),
        Some("Image selection cancelled")
    );
    assert!(state.original.is_none());
    assert!(state.compressed.is_none());
    assert!(state.payload.is_none());
}

#[tokio::test]
async fn cancellation_after_success_keeps_previous_results_visible() {
    let picker = ScriptedPicker::new(vec![
        selected("file://a.jpg", Some(500_000)),
        PickOutcome::Cancelled,
    ]);
    let compressor = ScriptedCompressor::new(vec![Ok("file://b.jpg".to_string())]);
    let files = ScriptedFileStore::new(vec![200_000], vec!["AAAA".to_string()]);
    let mut harness = build_workflow(picker, compressor, files);

    harness
        .workflow
        .run_workflow()
        .await
        .expect("first run should succeed");
    let result = harness.workflow.run_workflow().await;
    assert!(matches!(result, Err(WorkflowError::Cancelled)));

    let state = harness.workflow.state();
    assert_eq!(
        state.error_message.as_deref(),
        Some("Image selection cancelled")
    );
    // 取消不触碰既有图片状态
    assert_eq!(
        state.original.as_ref().map(|o| o.uri.as_str()),
        Some("file://a.jpg")
    );
    assert_eq!(
        state.payload.as_ref().map(|p| p.data_uri.as_str()),
        Some("data:image/jpeg;base64,AAAA")
    );
}

#[tokio::test]
async fn empty_selection_sets_dedicated_error() {
    let picker = ScriptedPicker::new(vec![PickOutcome::Empty]);
    let compressor = ScriptedCompressor::new(vec![]);
    let files = ScriptedFileStore::new(vec![], vec![]);
    let mut harness = build_workflow(picker, compressor, files);

    let result = harness.workflow.run_workflow().await;
    assert!(matches!(result, Err(WorkflowError::NoSelection)));

    let state = harness.workflow.state();
    assert!(!state.loading);
    assert_eq!(state.error_message.as_deref(), Some("No image selected"));
}

#[tokio::test]
async fn compressor_failure_is_surfaced_and_keeps_committed_original() {
    let picker = ScriptedPicker::new(vec![selected("file://a.jpg", Some(500_000))]);
    let compressor =
        ScriptedCompressor::new(vec![Err(WorkflowError::Compress("encoder exploded".to_string()))]);
    let files = ScriptedFileStore::new(vec![], vec![]);
    let mut harness = build_workflow(picker, compressor, files);

    let result = harness.workflow.run_workflow().await;
    assert!(matches!(result, Err(WorkflowError::Compress(_))));

    let state = harness.workflow.state();
    assert!(!state.loading);
    let message = state.error_message.as_deref().expect("error must be user-visible");
    assert!(message.contains("encoder exploded"));

    // 选中即提交：失败后原图信息仍可见，产物为空
    assert_eq!(
        state.original.as_ref().map(|o| o.byte_size),
        Some(500_000)
    );
    assert!(state.compressed.is_none());
    assert!(state.payload.is_none());
}

#[tokio::test]
async fn file_size_defaults_to_zero_when_platform_withholds_it() {
    let picker = ScriptedPicker::new(vec![selected("file://a.jpg", None)]);
    let compressor = ScriptedCompressor::new(vec![Ok("file://b.jpg".to_string())]);
    let files = ScriptedFileStore::new(vec![200_000], vec!["AAAA".to_string()]);
    let mut harness = build_workflow(picker, compressor, files);

    harness
        .workflow
        .run_workflow()
        .await
        .expect("run should succeed");

    let state = harness.workflow.state();
    assert_eq!(state.original.as_ref().map(|o| o.byte_size), Some(0));
    // 原始体积为 0 时缩减百分比恒为 0
    assert_eq!(state.reduction_percentage(), 0);
}

#[tokio::test]
async fn second_run_fully_overwrites_first_run_results() {
    let picker = ScriptedPicker::new(vec![
        selected("file://a.jpg", Some(500_000)),
        selected("file://c.png", Some(2_000_000)),
    ]);
    let compressor = ScriptedCompressor::new(vec![
        Ok("file://b.jpg".to_string()),
        Ok("file://d.png".to_string()),
    ]);
    let files = ScriptedFileStore::new(
        vec![200_000, 1_000_000],
        vec!["AAAA".to_string(), "XYZ".to_string()],
    );
    let mut harness = build_workflow(picker, compressor, files);

    harness
        .workflow
        .run_workflow()
        .await
        .expect("first run should succeed");
    harness
        .workflow
        .run_workflow()
        .await
        .expect("second run should succeed");

    let state = harness.workflow.state();
    assert_eq!(
        state.original.as_ref().map(|o| o.uri.as_str()),
        Some("file://c.png")
    );
    assert_eq!(
        state.compressed.as_ref().map(|c| c.uri.as_str()),
        Some("file://d.png")
    );
    let payload = state.payload.as_ref().expect("payload should be set");
    assert_eq!(payload.mime_type, "image/png");
    assert_eq!(payload.data_uri, "data:image/png;base64,XYZ");
    assert_eq!(state.reduction_percentage(), 50);
}

#[tokio::test]
async fn copy_payload_puts_exact_data_uri_on_clipboard_and_notifies() {
    let picker = ScriptedPicker::new(vec![selected("file://a.png", Some(100))]);
    let compressor = ScriptedCompressor::new(vec![Ok("file://b.png".to_string())]);
    let files = ScriptedFileStore::new(vec![50], vec!["XYZ".to_string()]);
    let mut harness = build_workflow(picker, compressor, files);

    harness
        .workflow
        .run_workflow()
        .await
        .expect("run should succeed");
    harness
        .workflow
        .copy_payload()
        .await
        .expect("copy should succeed");

    assert_eq!(
        harness.clipboard.last_text().as_deref(),
        Some("data:image/png;base64,XYZ")
    );

    let notifications = harness.notifications.lock().expect("notifier lock poisoned");
    assert_eq!(notifications.len(), 1);
}

#[tokio::test]
async fn copy_payload_without_run_copies_empty_string() {
    let picker = ScriptedPicker::new(vec![]);
    let compressor = ScriptedCompressor::new(vec![]);
    let files = ScriptedFileStore::new(vec![], vec![]);
    let harness = build_workflow(picker, compressor, files);

    harness
        .workflow
        .copy_payload()
        .await
        .expect("copy should succeed even without payload");

    assert_eq!(harness.clipboard.last_text().as_deref(), Some(""));
}
