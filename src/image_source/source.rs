//! # 来源契约与内置来源
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageSource` 表示视图依赖的协作方契约（判空、同步尝试、可取消打开）
//! - `SourceHandle` 提供按引用判等的共享句柄，视图用它识别“同一来源重复赋值”
//! - `DecodedSource` / `EncodedSource` 是两个内置实现
//! - `RawImageData` 表示已加载但未解码的字节

use std::fmt;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use super::{DecodedImage, ImageError, ImageLoadConfig};

/// 图片来源契约。
///
/// 视图从不修改来源，只比较身份并调用两个打开方法：
/// - `try_open_sync`：在拥有线程上调用，必须廉价；无法立即给出结果时返回 `None`
/// - `open`：在阻塞线程池上调用，可以做 I/O 与解码；失败时返回 `None`
pub trait ImageSource: Send + Sync {
    /// 是否有可显示的内容。
    fn has_source(&self) -> bool;

    /// 同步尝试打开。
    fn try_open_sync(&self) -> Option<DecodedImage>;

    /// 阻塞打开，应在合适的检查点观察 `cancel`。
    fn open(&self, cancel: &CancellationToken) -> Option<DecodedImage>;

    /// 日志用描述。
    fn describe(&self) -> String {
        "image source".to_string()
    }
}

/// 来源共享句柄，`PartialEq` 比较的是引用身份而非内容。
#[derive(Clone)]
pub struct SourceHandle(Arc<dyn ImageSource>);

impl SourceHandle {
    pub fn new(source: impl ImageSource + 'static) -> Self {
        Self(Arc::new(source))
    }

    pub fn from_arc(source: Arc<dyn ImageSource>) -> Self {
        Self(source)
    }
}

impl Deref for SourceHandle {
    type Target = dyn ImageSource;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for SourceHandle {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl Eq for SourceHandle {}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SourceHandle").field(&self.0.describe()).finish()
    }
}

/// 已解码像素来源：同步打开总是成功。
#[derive(Debug, Clone)]
pub struct DecodedSource {
    image: DecodedImage,
}

impl DecodedSource {
    pub fn new(image: DecodedImage) -> Self {
        Self { image }
    }
}

impl ImageSource for DecodedSource {
    fn has_source(&self) -> bool {
        self.image.width() > 0 && self.image.height() > 0
    }

    fn try_open_sync(&self) -> Option<DecodedImage> {
        Some(self.image.clone())
    }

    fn open(&self, _cancel: &CancellationToken) -> Option<DecodedImage> {
        Some(self.image.clone())
    }

    fn describe(&self) -> String {
        format!("decoded {}x{}", self.image.width(), self.image.height())
    }
}

/// 编码字节的来源位置。
#[derive(Debug, Clone)]
pub enum ImageOrigin {
    /// 内存中的编码字节。
    Bytes(Arc<[u8]>),
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
    /// 本地文件路径。
    FilePath(PathBuf),
}

/// 编码来源：只能在后台解码，同步尝试总是返回 `None`。
#[derive(Debug, Clone)]
pub struct EncodedSource {
    pub(super) origin: ImageOrigin,
    pub(super) config: ImageLoadConfig,
}

impl EncodedSource {
    pub fn new(origin: ImageOrigin) -> Self {
        Self {
            origin,
            config: ImageLoadConfig::default(),
        }
    }

    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new(ImageOrigin::Bytes(bytes.into()))
    }

    pub fn from_base64(data: impl Into<String>) -> Self {
        Self::new(ImageOrigin::Base64(data.into()))
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(ImageOrigin::FilePath(path.into()))
    }

    pub fn with_config(mut self, config: ImageLoadConfig) -> Self {
        self.config = config;
        self
    }

    /// 加载并解码，记录 `load/decode/total` 阶段耗时。
    pub fn load_and_decode(&self, cancel: &CancellationToken) -> Result<DecodedImage, ImageError> {
        let total_start = Instant::now();

        let load_start = Instant::now();
        let raw = self.load_raw()?;
        let load_elapsed = load_start.elapsed();

        if cancel.is_cancelled() {
            return Err(ImageError::Cancelled(format!(
                "加载完成后检测到取消（来源：{}）",
                raw.source_hint
            )));
        }

        let decode_start = Instant::now();
        let decoded = self.decode_for_display(raw, cancel)?;
        let decode_elapsed = decode_start.elapsed();

        log::info!(
            "✅ 图片打开完成 - load={}ms decode={}ms total={}ms",
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(decoded)
    }
}

impl ImageSource for EncodedSource {
    fn has_source(&self) -> bool {
        match &self.origin {
            ImageOrigin::Bytes(bytes) => !bytes.is_empty(),
            ImageOrigin::Base64(data) => !data.trim().is_empty(),
            ImageOrigin::FilePath(path) => !path.as_os_str().is_empty(),
        }
    }

    fn try_open_sync(&self) -> Option<DecodedImage> {
        None
    }

    fn open(&self, cancel: &CancellationToken) -> Option<DecodedImage> {
        match self.load_and_decode(cancel) {
            Ok(image) => Some(image),
            Err(ImageError::Cancelled(reason)) => {
                log::debug!("⏹️ 图片打开已取消：{}", reason);
                None
            }
            Err(err) => {
                log::warn!(
                    "⚠️ 图片打开失败 [{}/{}]（{}）：{}",
                    err.stage(),
                    err.code(),
                    self.describe(),
                    err
                );
                None
            }
        }
    }

    fn describe(&self) -> String {
        match &self.origin {
            ImageOrigin::Bytes(bytes) => format!("bytes ({} B)", bytes.len()),
            ImageOrigin::Base64(data) => format!("base64 ({} chars)", data.len()),
            ImageOrigin::FilePath(path) => format!("file {}", path.display()),
        }
    }
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}
