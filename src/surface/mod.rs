//! # 原生表面模块（surface）
//!
//! ## 设计思路
//!
//! 视图不直接操作绘制对象，而是通过两层抽象：
//!
//! - `NativeSurface`：协作方契约，真实平台实现（图层、纹理、GPU 表面）只需实现它
//! - `SurfaceAdapter`：包在契约外的一层记账，统一回答“是否有图”“固有尺寸是多少”
//!
//! `SoftwareSurface` 是一个 CPU 实现，按归一化内容区域与裁剪路径把像素合成到缓冲区，
//! 既用于演示程序输出 PNG，也用于在测试中观察整条链路的最终像素。
//!
//! ## 实现思路
//!
//! 表面由 `SurfaceFactory` 懒创建：视图第一次需要表面时才调用工厂。

mod adapter;
mod software;

pub use adapter::SurfaceAdapter;
pub use software::SoftwareSurface;

use crate::geometry::{ContentMode, NormalizedRect, Rect};
use crate::image_source::DecodedImage;

/// 原生绘制表面契约。
pub trait NativeSurface {
    /// 设置显示内容；`None` 表示“无图”。
    fn set_image(&mut self, image: Option<&DecodedImage>);

    /// 清空显示内容，需幂等。
    fn reset(&mut self);

    /// 以归一化矩形定位/裁剪内容，并设置裁剪路径（表面坐标）。
    fn set_content_region(&mut self, region: NormalizedRect, clip: Rect);

    /// 旧版模式：交给表面按粗粒度内容模式自行定位。
    fn set_content_mode(&mut self, mode: ContentMode);
}

/// 表面工厂，视图在第一次需要表面时调用。
pub trait SurfaceFactory {
    fn create_surface(&self) -> Box<dyn NativeSurface>;
}

impl<F> SurfaceFactory for F
where
    F: Fn() -> Box<dyn NativeSurface>,
{
    fn create_surface(&self) -> Box<dyn NativeSurface> {
        self()
    }
}
