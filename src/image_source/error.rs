//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载加载/解码链路中的所有错误来源，避免字符串拼接式错误处理。
//! 这些错误不会抛给视图：`ImageSource::open` 记录日志后返回 `None`，
//! 由视图统一转为“打开失败”通知。

/// 图片加载统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("已取消：{0}")]
    Cancelled(String),
}

impl ImageError {
    /// 稳定错误码，便于日志检索。
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileSystem(_) => "E_FILE",
            Self::InvalidFormat(_) => "E_FORMAT",
            Self::Decode(_) => "E_DECODE",
            Self::ResourceLimit(_) => "E_LIMIT",
            Self::Cancelled(_) => "E_CANCELLED",
        }
    }

    /// 出错阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FileSystem(_) => "load",
            Self::InvalidFormat(_) | Self::Decode(_) | Self::ResourceLimit(_) => "decode",
            Self::Cancelled(_) => "cancel",
        }
    }
}

impl From<ImageError> for String {
    fn from(error: ImageError) -> Self {
        error.to_string()
    }
}
