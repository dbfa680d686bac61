use crate::geometry::{ContentMode, NormalizedRect, Rect, Size};
use crate::image_source::DecodedImage;

use super::NativeSurface;

/// 原生表面适配器。
///
/// 记录最近一次 `set_image` 是否携带图片以及图片固有尺寸，
/// 视图据此决定是否需要布局、应触发成功还是失败通知。
pub struct SurfaceAdapter {
    native: Box<dyn NativeSurface>,
    has_image: bool,
    image_size: Size,
}

impl SurfaceAdapter {
    pub fn new(native: Box<dyn NativeSurface>) -> Self {
        Self {
            native,
            has_image: false,
            image_size: Size::ZERO,
        }
    }

    /// 清空显示内容。
    pub fn reset(&mut self) {
        self.native.reset();
        self.has_image = false;
        self.image_size = Size::ZERO;
    }

    pub fn set_image(&mut self, image: Option<&DecodedImage>) {
        self.native.set_image(image);
        self.has_image = image.is_some();
        self.image_size = image.map(DecodedImage::size).unwrap_or(Size::ZERO);
    }

    pub fn has_image(&self) -> bool {
        self.has_image
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    /// 纯变换操作，不会重新解码。
    pub fn set_content_region(&mut self, region: NormalizedRect, clip: Rect) {
        self.native.set_content_region(region, clip);
    }

    pub fn set_content_mode(&mut self, mode: ContentMode) {
        self.native.set_content_mode(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SoftwareSurface;
    use image::RgbaImage;

    #[test]
    fn tracks_image_presence_and_size() {
        let native = SoftwareSurface::new();
        let mut adapter = SurfaceAdapter::new(Box::new(native.clone()));
        assert!(!adapter.has_image());

        let image = DecodedImage::new(RgbaImage::new(12, 8));
        adapter.set_image(Some(&image));
        assert!(adapter.has_image());
        assert_eq!(adapter.image_size(), Size::new(12.0, 8.0));
        assert!(native.image().is_some());

        adapter.set_image(None);
        assert!(!adapter.has_image());
        assert_eq!(adapter.image_size(), Size::ZERO);
    }

    #[test]
    fn reset_is_idempotent() {
        let native = SoftwareSurface::new();
        let mut adapter = SurfaceAdapter::new(Box::new(native.clone()));
        adapter.set_image(Some(&DecodedImage::new(RgbaImage::new(2, 2))));

        adapter.reset();
        adapter.reset();

        assert!(!adapter.has_image());
        assert!(native.image().is_none());
    }
}
