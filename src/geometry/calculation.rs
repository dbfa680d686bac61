//! 内容摆放计算模块
//!
//! 该模块实现“单视图内”的图片摆放算法，分三步：
//!
//! 1. **测量** (`measure_source`)：按拉伸策略求出图片在屏幕上的占位尺寸（容器尺寸）。
//! 2. **排列** (`arrange_source`)：按对齐方式把容器放进可用区域，得到内容矩形，
//!    内容矩形允许超出可用区域（例如 `UniformToFill` 的溢出）。
//! 3. **归一化** (`compute_placement`)：求可见裁剪区域，并把可见视口表示为
//!    内容矩形的比例，供表面直接裁剪而无需重新缩放。
//!
//! # 设计思路
//!
//! - 算法纯函数化：输入为可用尺寸、固有尺寸、策略与对齐，输出唯一结果。
//! - 先算理想尺寸，再算位置，最后求交集，每一步都可以单独验证。
//! - 对退化输入（零尺寸、非有限可用尺寸）返回 `None`，由调用方跳过本次布局。

use super::{HorizontalAlignment, NormalizedRect, Rect, Size, StretchMode, VerticalAlignment};

/// 一次摆放计算的完整结果。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentPlacement {
    /// 图片在当前策略下的占位尺寸。
    pub container_size: Size,
    /// 图片逻辑上占据的矩形（视图坐标，可超出可用区域）。
    pub content_rect: Rect,
    /// 内容矩形与可用区域的交集，即可见裁剪区域。
    pub container_rect: Rect,
    /// 可见视口相对于内容矩形的比例（`x = content.x / content.width` 等）。
    pub relative: NormalizedRect,
}

impl ContentPlacement {
    /// 交给表面的归一化内容区域：`(-relative.x, -relative.y, relative.width, relative.height)`。
    pub fn content_region(&self) -> NormalizedRect {
        NormalizedRect::new(
            -self.relative.x,
            -self.relative.y,
            self.relative.width,
            self.relative.height,
        )
    }
}

/// 计算图片在可用区域内的占位尺寸。
///
/// # 规则
/// - `None`：固有尺寸
/// - `Fill`：可用尺寸（无限轴回退为固有尺寸）
/// - `Uniform`：等比缩放，取较小比例，完整放入
/// - `UniformToFill`：等比缩放，取较大比例，铺满
///
/// 可用尺寸某一轴为无限时，只按另一轴的比例缩放；两轴都无限时保持固有尺寸。
///
/// # 示例
/// ```
/// use image_view::geometry::{Size, StretchMode, measure_source};
///
/// let size = measure_source(Size::new(200.0, 100.0), Size::new(100.0, 100.0), StretchMode::Uniform);
/// assert_eq!(size, Size::new(100.0, 100.0));
/// ```
pub fn measure_source(available: Size, source: Size, stretch: StretchMode) -> Size {
    if source.has_zero_dimension() {
        return Size::ZERO;
    }

    match stretch {
        StretchMode::None => source,
        StretchMode::Fill => Size::new(
            if available.width.is_finite() { available.width } else { source.width },
            if available.height.is_finite() { available.height } else { source.height },
        ),
        StretchMode::Uniform | StretchMode::UniformToFill => {
            let scale_x = available.width / source.width;
            let scale_y = available.height / source.height;

            let scale = match (scale_x.is_finite(), scale_y.is_finite()) {
                (true, true) if stretch == StretchMode::Uniform => scale_x.min(scale_y),
                (true, true) => scale_x.max(scale_y),
                (true, false) => scale_x,
                (false, true) => scale_y,
                (false, false) => 1.0,
            };

            Size::new(source.width * scale, source.height * scale)
        }
    }
}

/// 按对齐方式把容器放进可用区域，返回内容矩形。
///
/// 剩余空间为负（容器大于可用区域）时不做收敛，居中会向左/上偏移，
/// 这样溢出部分在两侧对称地被裁掉。
pub fn arrange_source(
    available: Size,
    container: Size,
    horizontal: HorizontalAlignment,
    vertical: VerticalAlignment,
) -> Rect {
    let free_x = available.width - container.width;
    let free_y = available.height - container.height;

    let x = match horizontal {
        HorizontalAlignment::Left => 0.0,
        HorizontalAlignment::Right => free_x,
        HorizontalAlignment::Center | HorizontalAlignment::Stretch => free_x / 2.0,
    };

    let y = match vertical {
        VerticalAlignment::Top => 0.0,
        VerticalAlignment::Bottom => free_y,
        VerticalAlignment::Center | VerticalAlignment::Stretch => free_y / 2.0,
    };

    Rect::new(x, y, container.width, container.height)
}

/// 计算完整摆放结果（精确模式）。
///
/// # 实现步骤
/// 1. 可用尺寸或固有尺寸存在零维度、可用尺寸非有限 → 返回 `None`
/// 2. `measure_source` 求容器尺寸
/// 3. `arrange_source` 求内容矩形
/// 4. 内容矩形与 `Rect(0, 0, available)` 求交，得到裁剪区域
/// 5. 以内容矩形为单位归一化可见视口
///
/// # 后置条件
/// - `content_rect.width > 0 && content_rect.height > 0`（否则返回 `None`，不会除零）
/// - `container_rect` 完全位于可用区域内
///
/// # 示例
/// ```
/// use image_view::geometry::{
///     HorizontalAlignment, Rect, Size, StretchMode, VerticalAlignment, compute_placement,
/// };
///
/// let placement = compute_placement(
///     Size::new(200.0, 100.0),
///     Size::new(100.0, 100.0),
///     StretchMode::Uniform,
///     HorizontalAlignment::Center,
///     VerticalAlignment::Center,
/// )
/// .unwrap();
/// assert_eq!(placement.content_rect, Rect::new(50.0, 0.0, 100.0, 100.0));
/// ```
pub fn compute_placement(
    available: Size,
    source: Size,
    stretch: StretchMode,
    horizontal: HorizontalAlignment,
    vertical: VerticalAlignment,
) -> Option<ContentPlacement> {
    if available.has_zero_dimension() || !available.is_finite() || source.has_zero_dimension() {
        return None;
    }

    let container_size = measure_source(available, source, stretch);
    if container_size.has_zero_dimension() || !container_size.is_finite() {
        log::debug!(
            "摆放跳过：容器尺寸退化 {}x{}（stretch={}）",
            container_size.width,
            container_size.height,
            stretch
        );
        return None;
    }

    let content_rect = arrange_source(available, container_size, horizontal, vertical);
    let container_rect = Rect::from_size(available).intersect(&content_rect);

    let relative = NormalizedRect::new(
        content_rect.x / content_rect.width,
        content_rect.y / content_rect.height,
        available.width / content_rect.width,
        available.height / content_rect.height,
    );

    Some(ContentPlacement {
        container_size,
        content_rect,
        container_rect,
        relative,
    })
}
