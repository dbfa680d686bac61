//! 几何模块（内容摆放的基础类型与算法）
//!
//! 该模块负责以下核心能力：
//! - 定义视图坐标系下的 `Size` / `Point` / `Rect` 与归一化矩形 `NormalizedRect`
//! - 定义拉伸策略 `StretchMode` 与水平/垂直对齐方式
//! - 将拉伸策略映射为旧版原生内容模式 `ContentMode`
//! - 在 `calculation` 子模块中实现测量、排列与归一化裁剪的纯函数
//!
//! # 设计思路
//!
//! 1. **纯数据 + 纯函数**：几何层不持有任何状态，也不依赖表面或视图，
//!    输入尺寸与策略即可得到唯一结果，便于单元测试与属性测试。
//! 2. **退化输入走早返回**：零尺寸、负尺寸、非有限值统一视为“无可摆放内容”，
//!    由调用方跳过本次布局，而不是抛出错误。
//!
//! # 坐标系统说明
//!
//! 原点位于视图左上角，X 轴向右、Y 轴向下增大；单位为逻辑像素（`f64`）。

pub mod calculation;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

pub use calculation::{ContentPlacement, arrange_source, compute_placement, measure_source};

/// 二维尺寸（宽、高）。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// 任一维度不大于 0（含 NaN）即视为退化尺寸。
    pub fn has_zero_dimension(&self) -> bool {
        !(self.width > 0.0) || !(self.height > 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f64, height as f64)
    }
}

/// 二维坐标点。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 轴对齐矩形（左上角 + 尺寸）。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// 以原点为左上角、覆盖整个 `size` 的矩形。
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.size().has_zero_dimension()
    }

    /// 半开区间判定：左/上边包含，右/下边不包含。
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// 求交集。无重叠时返回位于重叠起点、宽高为 0 的矩形。
    pub fn intersect(&self, other: &Rect) -> Rect {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Rect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0))
    }
}

/// 以内容矩形为单位 1 表示的矩形，供合成表面在不重新缩放的前提下裁剪。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedRect {
    /// 完整显示内容（不裁剪、不留白）。
    pub const UNIT: NormalizedRect = NormalizedRect { x: 0.0, y: 0.0, width: 1.0, height: 1.0 };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// 图片固有尺寸放入可用区域时的拉伸策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StretchMode {
    /// 保持固有尺寸。
    None,
    /// 直接拉伸到可用尺寸，不保持宽高比。
    Fill,
    /// 保持宽高比，完整放入可用区域。
    #[default]
    Uniform,
    /// 保持宽高比，铺满可用区域（可能溢出被裁剪）。
    UniformToFill,
}

impl StretchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fill => "fill",
            Self::Uniform => "uniform",
            Self::UniformToFill => "uniform_to_fill",
        }
    }
}

impl fmt::Display for StretchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StretchMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "none" => Ok(Self::None),
            "fill" => Ok(Self::Fill),
            "uniform" => Ok(Self::Uniform),
            "uniform_to_fill" | "uniformtofill" => Ok(Self::UniformToFill),
            other => Err(format!(
                "未知拉伸策略：{}（可选：none / fill / uniform / uniform_to_fill）",
                other
            )),
        }
    }
}

/// 水平对齐方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
    /// 容器尺寸已由拉伸策略决定，摆放时等同居中。
    Stretch,
}

/// 垂直对齐方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
    Stretch,
}

/// 旧版原生表面的粗粒度内容模式，由表面自行完成定位。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    Center,
    ScaleAspectFit,
    ScaleAspectFill,
    ScaleToFill,
}

impl From<StretchMode> for ContentMode {
    fn from(stretch: StretchMode) -> Self {
        match stretch {
            StretchMode::Uniform => Self::ScaleAspectFit,
            StretchMode::UniformToFill => Self::ScaleAspectFill,
            StretchMode::None => Self::Center,
            StretchMode::Fill => Self::ScaleToFill,
        }
    }
}

impl From<ContentMode> for StretchMode {
    fn from(mode: ContentMode) -> Self {
        match mode {
            ContentMode::ScaleAspectFit => Self::Uniform,
            ContentMode::ScaleAspectFill => Self::UniformToFill,
            ContentMode::Center => Self::None,
            ContentMode::ScaleToFill => Self::Fill,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimension_detection() {
        assert!(Size::ZERO.has_zero_dimension());
        assert!(Size::new(10.0, 0.0).has_zero_dimension());
        assert!(Size::new(-1.0, 10.0).has_zero_dimension());
        assert!(Size::new(f64::NAN, 10.0).has_zero_dimension());
        assert!(!Size::new(1.0, 1.0).has_zero_dimension());
    }

    #[test]
    fn test_intersect_overlapping() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, -20.0, 100.0, 60.0);

        assert_eq!(a.intersect(&b), Rect::new(50.0, 0.0, 50.0, 40.0));
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 5.0, 5.0);

        assert!(a.intersect(&b).is_empty());
    }

    #[test]
    fn test_stretch_from_str() {
        assert_eq!("Uniform".parse::<StretchMode>(), Ok(StretchMode::Uniform));
        assert_eq!("uniform-to-fill".parse::<StretchMode>(), Ok(StretchMode::UniformToFill));
        assert_eq!(" none ".parse::<StretchMode>(), Ok(StretchMode::None));
        assert!("zoom".parse::<StretchMode>().is_err());
    }

    #[test]
    fn test_content_mode_mapping_is_reversible() {
        for stretch in [
            StretchMode::None,
            StretchMode::Fill,
            StretchMode::Uniform,
            StretchMode::UniformToFill,
        ] {
            assert_eq!(StretchMode::from(ContentMode::from(stretch)), stretch);
        }
    }
}
