//! CPU 合成表面。

use std::sync::{Arc, Mutex, MutexGuard};

use image::RgbaImage;

use crate::geometry::{
    ContentMode, HorizontalAlignment, NormalizedRect, Point, Rect, Size, StretchMode,
    VerticalAlignment, compute_placement,
};
use crate::image_source::DecodedImage;

use super::NativeSurface;

#[derive(Debug, Default)]
struct SoftwareSurfaceState {
    image: Option<DecodedImage>,
    region: Option<(NormalizedRect, Rect)>,
    content_mode: Option<ContentMode>,
    set_image_calls: usize,
    reset_calls: usize,
    region_updates: usize,
}

/// 软件表面。
///
/// 克隆得到的是同一表面的另一个句柄：视图持有一份，调用方持有另一份用于读取状态或合成。
#[derive(Debug, Clone, Default)]
pub struct SoftwareSurface {
    state: Arc<Mutex<SoftwareSurfaceState>>,
}

impl SoftwareSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回一个每次都交出本表面句柄的工厂。
    pub fn factory(&self) -> impl Fn() -> Box<dyn NativeSurface> + 'static {
        let surface = self.clone();
        move || -> Box<dyn NativeSurface> { Box::new(surface.clone()) }
    }

    fn state(&self) -> MutexGuard<'_, SoftwareSurfaceState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("软件表面状态锁中毒，继续使用恢复数据");
                poisoned.into_inner()
            }
        }
    }

    pub fn image(&self) -> Option<DecodedImage> {
        self.state().image.clone()
    }

    /// 最近一次设置的归一化内容区域与裁剪矩形。
    pub fn content_region(&self) -> Option<(NormalizedRect, Rect)> {
        self.state().region
    }

    pub fn content_mode(&self) -> Option<ContentMode> {
        self.state().content_mode
    }

    pub fn set_image_calls(&self) -> usize {
        self.state().set_image_calls
    }

    pub fn reset_calls(&self) -> usize {
        self.state().reset_calls
    }

    pub fn region_updates(&self) -> usize {
        self.state().region_updates
    }

    /// 把当前内容合成到 `view_size` 大小的透明画布上（最近邻采样）。
    ///
    /// 定位优先使用归一化内容区域；没有区域时按内容模式自行计算；两者都没有则铺满视图。
    pub fn render(&self, view_size: (u32, u32)) -> RgbaImage {
        let (width, height) = view_size;
        let mut canvas = RgbaImage::new(width, height);

        let state = self.state();
        let Some(image) = state.image.as_ref() else {
            return canvas;
        };

        let view = Size::from(view_size);
        let (region, clip) = match (state.region, state.content_mode) {
            (Some(region), _) => region,
            (None, Some(mode)) => match compute_placement(
                view,
                image.size(),
                StretchMode::from(mode),
                HorizontalAlignment::Center,
                VerticalAlignment::Center,
            ) {
                Some(placement) => (placement.content_region(), placement.container_rect),
                None => return canvas,
            },
            (None, None) => (NormalizedRect::UNIT, Rect::from_size(view)),
        };

        if region.width <= 0.0 || region.height <= 0.0 {
            return canvas;
        }

        let pixels = image.pixels();
        let (image_width, image_height) = pixels.dimensions();

        for py in 0..height {
            let center_y = py as f64 + 0.5;
            let v = region.y + center_y / height as f64 * region.height;
            if !(0.0..1.0).contains(&v) {
                continue;
            }
            let sy = ((v * image_height as f64) as u32).min(image_height.saturating_sub(1));

            for px in 0..width {
                let center_x = px as f64 + 0.5;
                if !clip.contains(Point::new(center_x, center_y)) {
                    continue;
                }

                let u = region.x + center_x / width as f64 * region.width;
                if !(0.0..1.0).contains(&u) {
                    continue;
                }
                let sx = ((u * image_width as f64) as u32).min(image_width.saturating_sub(1));

                canvas.put_pixel(px, py, *pixels.get_pixel(sx, sy));
            }
        }

        canvas
    }
}

impl NativeSurface for SoftwareSurface {
    fn set_image(&mut self, image: Option<&DecodedImage>) {
        let mut state = self.state();
        state.image = image.cloned();
        state.set_image_calls += 1;
    }

    fn reset(&mut self) {
        let mut state = self.state();
        state.image = None;
        state.reset_calls += 1;
    }

    fn set_content_region(&mut self, region: NormalizedRect, clip: Rect) {
        let mut state = self.state();
        state.region = Some((region, clip));
        state.region_updates += 1;
    }

    fn set_content_mode(&mut self, mode: ContentMode) {
        self.state().content_mode = Some(mode);
    }
}
