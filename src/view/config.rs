//! # 视图配置模块
//!
//! ## 设计思路
//!
//! 视图级配置只有两类：摆放策略（精确 / 旧版兼容）与初始属性（拉伸、对齐），
//! 以及交给内置来源的加载配置。旧版兼容开关属于外部配置，不随单次请求变化。
//!
//! ## 实现思路
//!
//! - 通过 `serde` 从 JSON 读取，缺省字段取 `Default`。
//! - 未知的拉伸/摆放名称在解析阶段即报错，不会带着非法值进入运行时。

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ViewError;
use crate::geometry::{HorizontalAlignment, StretchMode, VerticalAlignment};
use crate::image_source::ImageLoadConfig;

/// 内容摆放策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// 显式计算内容区域与裁剪路径。
    #[default]
    Precise,
    /// 把拉伸策略映射为原生内容模式，由表面自行定位。
    Legacy,
}

/// 视图配置。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageViewConfig {
    pub placement: PlacementMode,
    pub stretch: StretchMode,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub load: ImageLoadConfig,
}

impl ImageViewConfig {
    /// 从 JSON 字符串解析，套用加载配置中的解码档位并校验。
    ///
    /// # 示例
    /// ```
    /// use image_view::view::{ImageViewConfig, PlacementMode};
    ///
    /// let config = ImageViewConfig::from_json_str(r#"{ "placement": "legacy" }"#)?;
    /// assert_eq!(config.placement, PlacementMode::Legacy);
    /// # Ok::<(), image_view::ViewError>(())
    /// ```
    pub fn from_json_str(content: &str) -> Result<Self, ViewError> {
        let mut config: ImageViewConfig = serde_json::from_str(content)
            .map_err(|e| ViewError::Config(format!("解析视图配置失败: {}", e)))?;
        config.load = config.load.resolved()?;
        Ok(config)
    }

    /// 从 JSON 文件读取配置。
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ViewError> {
        let content = fs::read_to_string(path.as_ref())?;
        log::info!("⚙️ 已读取视图配置: {}", path.as_ref().display());
        Self::from_json_str(&content)
    }
}
