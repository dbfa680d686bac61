//! # 图片视图模块
//!
//! ## 设计思路
//!
//! 视图把“声明的图片来源”变成“表面上显示的像素”，分成四块：
//! - `config`：视图级配置（摆放策略、初始属性、加载限制）
//! - `host`：对外通知契约（重新布局、重绘、打开成功/失败）
//! - `state`：获取状态（已处理标记、待完成获取、阶段）
//! - `controller` / `layout`：`ImageView` 的获取状态机与布局边界
//!
//! ## 实现思路
//!
//! - 所有可变状态只在拥有线程上通过 `&mut self` 修改。
//! - 后台获取跑在 tokio 阻塞线程池，结果经 mpsc 队列回到拥有线程。

mod config;
mod controller;
mod host;
mod layout;
mod state;

pub use config::{ImageViewConfig, PlacementMode};
pub use controller::ImageView;
pub use host::{LogHost, ViewHost};
pub use state::{AcquisitionPhase, FetchOutcome};
