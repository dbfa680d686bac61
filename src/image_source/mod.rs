//! # 图片来源模块（image_source）
//!
//! ## 设计思路
//!
//! 该模块把“图片从哪里来、怎样变成可显示的像素”与视图状态机解耦：
//!
//! - `source`：`ImageSource` 协作方契约、按引用判等的 `SourceHandle`、内置来源实现
//! - `decoded`：`DecodedImage`（固有尺寸 + 共享 RGBA 像素 + 单色重着色）
//! - `loader`：负责 Base64/文件/内存字节加载与安全校验
//! - `pipeline`：负责解码、像素限制、降采样
//! - `config/error`：加载配置与错误模型
//!
//! ## 实现思路
//!
//! 视图层只依赖 `ImageSource` trait：同步尝试 `try_open_sync` 与可取消的阻塞打开 `open`。
//! 阻塞打开由视图投递到 tokio 阻塞线程池执行，因此对拥有线程而言是异步的。
//!
//! ## 调用链
//!
//! ```text
//! ImageView::try_open_image
//!    ├─ try_open_sync（DecodedSource 直接成功）
//!    └─ spawn_blocking → open(&token)
//!          ├─ loader.rs（来源加载 + 体积/签名校验）
//!          └─ pipeline.rs（解码 + 像素限制 + 降采样）
//! ```

mod config;
mod decoded;
mod error;
mod loader;
mod pipeline;
mod source;

pub use config::{DecodeProfile, ImageLoadConfig, ResizeFilter};
pub use decoded::DecodedImage;
pub use error::ImageError;
pub use source::{DecodedSource, EncodedSource, ImageOrigin, ImageSource, SourceHandle};
