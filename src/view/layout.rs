//! # 视图布局
//!
//! ## 设计思路
//!
//! 布局边界是视图与表面之间最后一道关口：
//! 精确模式下把摆放结果换算成归一化内容区域与裁剪矩形交给表面，
//! 旧版模式下完全交给表面的内容模式，不做矩形计算。
//!
//! ## 实现思路
//!
//! - `update_layer_rect` 用 `catch_unwind` 包住一次更新，表面的错误或 panic
//!   只记录日志，不向调用方传播。
//! - 退化输入（无表面、无图、零尺寸）直接跳过，保留上一次的区域。

use std::panic::{self, AssertUnwindSafe};

use super::ImageView;
use super::config::PlacementMode;
use crate::error::ViewError;
use crate::geometry::{Size, compute_placement, measure_source};

impl ImageView {
    /// 按当前边界、拉伸策略与对齐刷新表面的内容区域。
    ///
    /// 返回是否真正更新了表面。
    pub fn update_layer_rect(&mut self) -> bool {
        if self.config.placement == PlacementMode::Legacy {
            return false;
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.try_update_layer_rect()));

        match result {
            Ok(Ok(updated)) => updated,
            Ok(Err(e)) => {
                log::error!("❌ 更新内容区域失败: {}", e);
                false
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!("❌ 更新内容区域时表面崩溃: {}", message);
                false
            }
        }
    }

    fn try_update_layer_rect(&mut self) -> Result<bool, ViewError> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(false);
        };
        if !surface.has_image() {
            return Ok(false);
        }

        let Some(placement) = compute_placement(
            self.bounds,
            self.state.source_size,
            self.stretch,
            self.horizontal_alignment,
            self.vertical_alignment,
        ) else {
            log::trace!(
                "跳过布局：bounds={}x{} source={}x{}",
                self.bounds.width,
                self.bounds.height,
                self.state.source_size.width,
                self.state.source_size.height
            );
            return Ok(false);
        };

        let region = placement.content_region();
        if !(region.width.is_finite() && region.height.is_finite()) {
            return Err(ViewError::Layout(format!(
                "内容区域非有限: {}x{}",
                region.width, region.height
            )));
        }

        surface.set_content_region(region, placement.container_rect);
        log::debug!(
            "📐 内容区域已更新 - content=({:.1}, {:.1}, {:.1}x{:.1}) clip=({:.1}, {:.1}, {:.1}x{:.1})",
            placement.content_rect.x,
            placement.content_rect.y,
            placement.content_rect.width,
            placement.content_rect.height,
            placement.container_rect.x,
            placement.container_rect.y,
            placement.container_rect.width,
            placement.container_rect.height
        );
        Ok(true)
    }

    /// 测量：当前图片在 `available` 内按拉伸策略的期望尺寸，无图时为零。
    pub fn measure(&self, available: Size) -> Size {
        if !self.has_image() {
            return Size::ZERO;
        }
        measure_source(available, self.state.source_size, self.stretch)
    }
}
