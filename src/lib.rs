//! # 图片视图 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            宿主（属性系统 / 视图树 / 调用方）            │
//! │                                                          │
//! │  set_source ── set_stretch ── attach/detach ── bounds    │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ ViewHost（request_layout / image_opened / ...）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕                 ImageView                        │
//! │                                                          │
//! │  ┌─ view ─────────── 获取状态机 + 布局边界               │
//! │  │                   （同步尝试 / 后台获取 / 丢弃过期）  │
//! │  │                                                       │
//! │  ├─ image_source ─── 来源契约 + 加载·解码流水线          │
//! │  │                   （字节 / Base64 / 文件，带限制）    │
//! │  │                                                       │
//! │  ├─ geometry ─────── 测量 → 排列 → 归一化内容区域        │
//! │  │                                                       │
//! │  ├─ surface ──────── 原生表面契约 + 软件合成表面         │
//! │  └─ error ────────── ViewError 统一错误类型              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `ViewError` |
//! | [`geometry`] | 尺寸/矩形、拉伸策略、对齐、摆放计算 |
//! | [`image_source`] | `ImageSource` 契约、内置来源、加载与解码 |
//! | [`surface`] | `NativeSurface` 契约、`SurfaceAdapter`、`SoftwareSurface` |
//! | [`view`] | `ImageView` 获取状态机、布局、宿主契约与配置 |

pub mod error;
pub mod geometry;
pub mod image_source;
pub mod surface;
pub mod view;

pub use error::ViewError;
