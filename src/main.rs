//! # 图片视图 — 演示入口
//!
//! 把一个图片文件放进指定大小的视图，等待后台解码完成后，
//! 用软件表面合成并保存为 PNG。
//!
//! ```text
//! image-view <input> <width> <height> [stretch] [out.png]
//! ```
//!
//! 设置 `IMAGE_VIEW_CONFIG` 可从 JSON 文件读取视图配置，
//! 设置 `IMAGE_VIEW_PROFILE`（quality / balanced / speed）可覆盖解码档位。

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use image_view::ViewError;
use image_view::geometry::{Size, StretchMode};
use image_view::image_source::{DecodeProfile, EncodedSource, SourceHandle};
use image_view::surface::SoftwareSurface;
use image_view::view::{FetchOutcome, ImageView, ImageViewConfig, LogHost};

const USAGE: &str = "用法: image-view <input> <width> <height> [none|fill|uniform|uniform_to_fill] [out.png]";

struct CliArgs {
    input: PathBuf,
    width: u32,
    height: u32,
    stretch: Option<StretchMode>,
    output: PathBuf,
}

fn parse_args(args: &[String]) -> Result<CliArgs, ViewError> {
    let [input, width, height, rest @ ..] = args else {
        return Err(ViewError::Config(USAGE.to_string()));
    };

    let parse_dimension = |value: &str, name: &str| -> Result<u32, ViewError> {
        value
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| ViewError::Config(format!("{} 必须是正整数: {}", name, value)))
    };

    let stretch = rest
        .first()
        .map(|name| name.parse::<StretchMode>().map_err(ViewError::Config))
        .transpose()?;
    let output = rest
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("out.png"));

    Ok(CliArgs {
        input: PathBuf::from(input),
        width: parse_dimension(width.as_str(), "width")?,
        height: parse_dimension(height.as_str(), "height")?,
        stretch,
        output,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    let mut config = match env::var_os("IMAGE_VIEW_CONFIG") {
        Some(path) => ImageViewConfig::load_from_file(path)?,
        None => ImageViewConfig::default(),
    };
    if let Some(stretch) = cli.stretch {
        config.stretch = stretch;
    }
    if let Ok(profile) = env::var("IMAGE_VIEW_PROFILE") {
        config.load.apply_decode_profile(profile.parse::<DecodeProfile>()?);
        config.load.validate()?;
    }
    log::info!(
        "🚀 启动 - input={} view={}x{} stretch={} placement={:?}",
        cli.input.display(),
        cli.width,
        cli.height,
        config.stretch,
        config.placement
    );

    let surface = SoftwareSurface::new();
    let source = SourceHandle::new(EncodedSource::from_file(&cli.input).with_config(config.load.clone()));

    let mut view = ImageView::on_current_runtime(config, Arc::new(LogHost), surface.factory())?;
    view.set_bounds(Size::from((cli.width, cli.height)));
    view.set_source(Some(source));
    view.attach();

    while let Some(outcome) = view.next_completion().await {
        log::debug!("后台获取结果: {:?}", outcome);
        if outcome != FetchOutcome::Discarded {
            break;
        }
    }

    if !view.has_image() {
        return Err(format!("无法打开图片: {}", cli.input.display()).into());
    }

    let canvas = surface.render((cli.width, cli.height));
    canvas.save(&cli.output)?;
    log::info!("💾 已保存: {}", cli.output.display());

    Ok(())
}
