//! # 加载配置模块
//!
//! ## 设计思路
//!
//! `ImageLoadConfig` 只描述两件事：解码前的资源预算，以及交给表面的纹理上限。
//! 纹理上限只影响纹理分辨率，不影响图片的固有尺寸（布局始终按原图尺寸计算）。
//! 解码档位（quality / balanced / speed）是纹理参数的命名组合，可在配置里直接写档位名。
//!
//! ## 实现思路
//!
//! - `Default` 等同 balanced 档位。
//! - `resolved` 先套用档位再做范围校验，视图配置加载时调用一次。
//! - `check_decode_budget` / `texture_size` 供解码流水线使用。

use std::fmt;
use std::str::FromStr;

use fast_image_resize as fr;
use image::imageops::FilterType;
use serde::Deserialize;

use super::ImageError;

/// 纹理降采样滤镜。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResizeFilter {
    /// `image::imageops` 回退路径使用的滤镜。
    pub(crate) fn to_image_filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }

    /// `fast_image_resize` 的缩放算法。
    pub(crate) fn to_resize_alg(self) -> fr::ResizeAlg {
        match self {
            Self::Nearest => fr::ResizeAlg::Nearest,
            Self::Triangle => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            Self::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
            Self::Gaussian => fr::ResizeAlg::Convolution(fr::FilterType::Mitchell),
            Self::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
        }
    }
}

/// 解码档位。
///
/// - `Quality`：纹理保持原图分辨率
/// - `Balanced`：纹理长边不超过 4096
/// - `Speed`：纹理长边不超过 2048，最近邻缩放
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeProfile {
    Quality,
    Balanced,
    Speed,
}

impl DecodeProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl fmt::Display for DecodeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecodeProfile {
    type Err = ImageError;

    /// # 示例
    /// ```
    /// use image_view::image_source::DecodeProfile;
    ///
    /// let profile: DecodeProfile = "Speed".parse()?;
    /// assert_eq!(profile, DecodeProfile::Speed);
    /// # Ok::<(), image_view::image_source::ImageError>(())
    /// ```
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ImageError::InvalidFormat(format!(
                "未知解码档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }
}

/// 图片加载与解码配置。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageLoadConfig {
    /// 设置后覆盖下面三个纹理参数。
    pub profile: Option<DecodeProfile>,
    /// 原始字节体积上限（字节）。
    pub max_file_size: u64,
    /// 解码像素上限（`width * height`），超出直接拒绝。
    pub max_decoded_pixels: u64,
    /// 解码内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 是否把超大图片的纹理缩小到 `max_texture_dimension`。
    pub downscale_textures: bool,
    /// 纹理长边上限。
    pub max_texture_dimension: u32,
    pub resize_filter: ResizeFilter,
}

impl Default for ImageLoadConfig {
    fn default() -> Self {
        Self {
            profile: None,
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            downscale_textures: true,
            max_texture_dimension: 4096,
            resize_filter: ResizeFilter::Triangle,
        }
    }
}

impl ImageLoadConfig {
    /// 套用解码档位的纹理参数。
    pub fn apply_decode_profile(&mut self, profile: DecodeProfile) {
        self.profile = Some(profile);
        let (downscale, max_dimension, filter) = match profile {
            DecodeProfile::Quality => (false, 16_384, ResizeFilter::Lanczos3),
            DecodeProfile::Balanced => (true, 4096, ResizeFilter::Triangle),
            DecodeProfile::Speed => (true, 2048, ResizeFilter::Nearest),
        };
        self.downscale_textures = downscale;
        self.max_texture_dimension = max_dimension;
        self.resize_filter = filter;
    }

    /// 套用配置中的档位（如有）并校验，返回最终生效的配置。
    pub fn resolved(&self) -> Result<Self, ImageError> {
        let mut config = self.clone();
        if let Some(profile) = config.profile {
            config.apply_decode_profile(profile);
            log::debug!("⚙️ 已套用解码档位: {}", profile);
        }
        config.validate()?;
        Ok(config)
    }

    /// 校验参数范围。
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.max_file_size == 0 {
            return Err(ImageError::InvalidFormat("max_file_size 必须大于 0".to_string()));
        }
        if self.max_decoded_pixels == 0 || self.max_decoded_bytes == 0 {
            return Err(ImageError::InvalidFormat("解码预算必须大于 0".to_string()));
        }
        if !(64..=16_384).contains(&self.max_texture_dimension) {
            return Err(ImageError::InvalidFormat(
                "max_texture_dimension 必须在 64~16384 之间".to_string(),
            ));
        }
        Ok(())
    }

    /// 按头部尺寸检查像素数与预计内存，在完整解码前拒绝超大图片。
    pub(crate) fn check_decode_budget(&self, width: u32, height: u32) -> Result<(), ImageError> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels > self.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "{}x{} 超出像素预算 {}",
                width, height, self.max_decoded_pixels
            )));
        }

        let bytes = pixels * 4;
        if bytes > self.max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "{}x{} 预计占用 {} MB，超出预算 {} MB",
                width,
                height,
                bytes / (1024 * 1024),
                self.max_decoded_bytes / (1024 * 1024)
            )));
        }
        Ok(())
    }

    /// 纹理目标尺寸；无需缩小时返回 `None`。
    ///
    /// 按长边等比缩放并四舍五入，短边至少 1 像素。
    pub(crate) fn texture_size(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let longest = width.max(height);
        if !self.downscale_textures || longest <= self.max_texture_dimension {
            return None;
        }

        let scale = f64::from(self.max_texture_dimension) / f64::from(longest);
        let fit = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, self.max_texture_dimension);
        Some((fit(width), fit(height)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ImageLoadConfig::default();

        config.validate().expect("default config should be valid");
        assert!(config.profile.is_none());
    }

    #[test]
    fn every_profile_resolves_to_valid_config() {
        for profile in [DecodeProfile::Quality, DecodeProfile::Balanced, DecodeProfile::Speed] {
            let config = ImageLoadConfig {
                profile: Some(profile),
                ..ImageLoadConfig::default()
            };

            let resolved = config.resolved().expect("profile config should be valid");
            assert_eq!(resolved.profile, Some(profile));
        }
    }

    #[test]
    fn speed_profile_overrides_texture_settings() {
        let config: ImageLoadConfig =
            serde_json::from_str(r#"{ "profile": "speed", "max_texture_dimension": 8000 }"#)
                .expect("config should parse");

        let resolved = config.resolved().expect("config should resolve");

        assert_eq!(resolved.max_texture_dimension, 2048);
        assert_eq!(resolved.resize_filter, ResizeFilter::Nearest);
    }

    #[test]
    fn rejects_unknown_profile() {
        let result = "ultra".parse::<DecodeProfile>();

        assert!(matches!(result, Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let config = ImageLoadConfig {
            max_texture_dimension: 16,
            ..ImageLoadConfig::default()
        };
        assert!(matches!(config.validate(), Err(ImageError::InvalidFormat(_))));

        let config = ImageLoadConfig {
            max_decoded_bytes: 0,
            ..ImageLoadConfig::default()
        };
        assert!(matches!(config.validate(), Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn decode_budget_checks_pixels_then_memory() {
        let config = ImageLoadConfig {
            max_decoded_pixels: 100,
            max_decoded_bytes: 200,
            ..ImageLoadConfig::default()
        };

        assert!(config.check_decode_budget(10, 5).is_ok());
        assert!(matches!(config.check_decode_budget(11, 10), Err(ImageError::ResourceLimit(_))));
        assert!(matches!(config.check_decode_budget(10, 10), Err(ImageError::ResourceLimit(_))));
    }

    #[test]
    fn texture_size_scales_longest_side() {
        let config = ImageLoadConfig::default();

        assert_eq!(config.texture_size(4096, 100), None);
        assert_eq!(config.texture_size(8192, 2048), Some((4096, 1024)));
        assert_eq!(config.texture_size(5000, 10), Some((4096, 8)));
        assert_eq!(config.texture_size(100_000, 1), Some((4096, 1)));

        let quality = ImageLoadConfig {
            downscale_textures: false,
            ..ImageLoadConfig::default()
        };
        assert_eq!(quality.texture_size(8192, 8192), None);
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let config: ImageLoadConfig =
            serde_json::from_str(r#"{ "max_texture_dimension": 2048, "resize_filter": "lanczos3" }"#)
                .expect("partial config should parse");

        assert_eq!(config.max_texture_dimension, 2048);
        assert_eq!(config.resize_filter, ResizeFilter::Lanczos3);
        assert_eq!(config.max_file_size, ImageLoadConfig::default().max_file_size);
    }
}
