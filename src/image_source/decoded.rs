//! 解码结果模型。

use std::fmt;
use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::geometry::Size;

/// 已解码的图片：固有尺寸 + 共享 RGBA 纹理像素。
///
/// 纹理可能因显示限制被降采样，固有尺寸始终是来源图片的原始像素尺寸，
/// 布局只使用固有尺寸；表面按归一化坐标采样纹理，不关心纹理分辨率。
/// 克隆只增加引用计数，交给表面时不会复制像素。
#[derive(Clone)]
pub struct DecodedImage {
    pixels: Arc<RgbaImage>,
    intrinsic: Size,
}

impl DecodedImage {
    /// 纹理即原图，固有尺寸取像素尺寸。
    pub fn new(pixels: RgbaImage) -> Self {
        let intrinsic = Size::from(pixels.dimensions());
        Self::with_intrinsic_size(pixels, intrinsic)
    }

    /// 纹理已被缩放，单独记录原图尺寸。
    pub fn with_intrinsic_size(pixels: RgbaImage, intrinsic: Size) -> Self {
        Self {
            pixels: Arc::new(pixels),
            intrinsic,
        }
    }

    /// 纹理宽度（像素）。
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// 纹理高度（像素）。
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// 固有尺寸（逻辑像素），布局与测量都以它为准。
    pub fn size(&self) -> Size {
        self.intrinsic
    }

    /// 纹理是否被降采样过。
    pub fn is_downscaled(&self) -> bool {
        Size::from(self.pixels.dimensions()) != self.intrinsic
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// 是否与 `other` 共享同一份像素。
    pub fn ptr_eq(&self, other: &DecodedImage) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// 单色重着色：所有非透明像素替换为 `color` 的 RGB，保留各自的 alpha。
    pub fn recolored(&self, color: Rgba<u8>) -> DecodedImage {
        let mut pixels = (*self.pixels).clone();
        for pixel in pixels.pixels_mut() {
            if pixel[3] > 0 {
                pixel[0] = color[0];
                pixel[1] = color[1];
                pixel[2] = color[2];
            }
        }
        DecodedImage::with_intrinsic_size(pixels, self.intrinsic)
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("texture", &self.pixels.dimensions())
            .field("intrinsic", &self.intrinsic)
            .finish()
    }
}
