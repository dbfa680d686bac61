//! # 显示解码流水线
//!
//! ## 设计思路
//!
//! 解码结果同时服务两方：布局需要原图的固有尺寸，表面只需要一张够用的纹理。
//! 因此流水线记录解码后的原图尺寸，再按配置决定是否缩小纹理，两者分开保存在 `DecodedImage` 中。
//!
//! ## 实现思路
//!
//! 1. 从头部猜格式、读尺寸，按解码预算拒绝超大图片（此时尚未分配像素）
//! 2. 按已知格式完整解码，完成后检查一次取消
//! 3. 记录固有尺寸；纹理超过上限时用 `fast_image_resize` 缩小，失败回退 `image` 自带缩放

use std::io::Cursor;

use fast_image_resize as fr;
use image::{DynamicImage, GenericImageView, ImageReader, RgbaImage};
use tokio_util::sync::CancellationToken;

use super::config::ResizeFilter;
use super::source::{EncodedSource, RawImageData};
use super::{DecodedImage, ImageError};
use crate::geometry::Size;

impl EncodedSource {
    /// 将原始字节解码为可显示的图片。
    pub(crate) fn decode_for_display(
        &self,
        raw: RawImageData,
        cancel: &CancellationToken,
    ) -> Result<DecodedImage, ImageError> {
        let reader = ImageReader::new(Cursor::new(raw.bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;
        let Some(format) = reader.format() else {
            return Err(ImageError::InvalidFormat(format!(
                "不支持的图片格式（来源：{}）",
                raw.source_hint
            )));
        };
        let (header_width, header_height) = reader
            .into_dimensions()
            .map_err(|e| ImageError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))?;
        self.config.check_decode_budget(header_width, header_height)?;

        let decoded = image::load_from_memory_with_format(&raw.bytes, format)
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;

        if cancel.is_cancelled() {
            return Err(ImageError::Cancelled(format!(
                "解码完成后检测到取消（来源：{}）",
                raw.source_hint
            )));
        }

        let (width, height) = decoded.dimensions();
        let intrinsic = Size::from((width, height));

        let texture = match self.config.texture_size(width, height) {
            Some((texture_width, texture_height)) => {
                log::info!(
                    "🧩 纹理降采样：{}x{} -> {}x{}（filter={:?}）",
                    width,
                    height,
                    texture_width,
                    texture_height,
                    self.config.resize_filter
                );
                downscale_texture(decoded, texture_width, texture_height, self.config.resize_filter)
            }
            None => decoded.into_rgba8(),
        };

        log::debug!(
            "✅ 图片解码成功 - 来源: {} 格式: {:?} 固有尺寸: {}x{} 纹理: {}x{}",
            raw.source_hint,
            format,
            width,
            height,
            texture.width(),
            texture.height()
        );

        Ok(DecodedImage::with_intrinsic_size(texture, intrinsic))
    }
}

fn downscale_texture(image: DynamicImage, width: u32, height: u32, filter: ResizeFilter) -> RgbaImage {
    let source = DynamicImage::ImageRgba8(image.into_rgba8());

    match resize_rgba(&source, width, height, filter) {
        Ok(texture) => texture,
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}", err);
            source
                .resize_exact(width, height, filter.to_image_filter())
                .into_rgba8()
        }
    }
}

fn resize_rgba(
    source: &DynamicImage,
    width: u32,
    height: u32,
    filter: ResizeFilter,
) -> Result<RgbaImage, ImageError> {
    let mut target = fr::images::Image::new(width, height, fr::PixelType::U8x4);
    let options = fr::ResizeOptions::new().resize_alg(filter.to_resize_alg());

    fr::Resizer::new()
        .resize(source, &mut target, &options)
        .map_err(|e| ImageError::Decode(format!("纹理缩放失败：{}", e)))?;

    RgbaImage::from_raw(width, height, target.into_vec())
        .ok_or_else(|| ImageError::Decode("纹理缓冲长度与尺寸不一致".to_string()))
}
