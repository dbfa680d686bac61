//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `ViewError` 枚举，承载配置、图片加载、布局与运行时错误。
//! 视图的公开入口（属性变更、布局）不会把错误抛给调用方：
//! 解码失败以通知形式送出，布局失败在布局边界记录日志。
//! `ViewError` 主要用于构造阶段与配置加载。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。

use crate::image_source::ImageError;

/// 视图级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// 配置解析或校验失败
    #[error("配置错误: {0}")]
    Config(String),

    /// 图片加载流水线错误
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 布局计算或表面更新失败
    #[error("布局失败: {0}")]
    Layout(String),

    /// 缺少可用的异步运行时
    #[error("运行时不可用: {0}")]
    Runtime(String),
}
