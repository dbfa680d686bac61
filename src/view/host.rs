//! 视图宿主契约（对外通知与重绘请求）。

use crate::image_source::DecodedImage;

/// 视图宿主。
///
/// 由视图树/属性系统一侧实现。所有方法都在视图的拥有线程上被调用；
/// 打开成功/失败通知在每次完成的获取尝试中至多触发一次。
pub trait ViewHost {
    /// 尺寸可能变化，请求重新测量与排列。
    fn request_layout(&self) {}

    /// 内容已清空，请求重绘。
    fn request_redisplay(&self) {}

    /// 图片已打开并交给表面。
    fn image_opened(&self, image: &DecodedImage);

    /// 来源存在但没有得到可用图片。
    fn image_failed(&self, image: Option<&DecodedImage>);
}

/// 只写日志的宿主，供命令行等无视图树场景使用。
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHost;

impl ViewHost for LogHost {
    fn request_layout(&self) {
        log::debug!("📐 请求重新布局");
    }

    fn image_opened(&self, image: &DecodedImage) {
        let size = image.size();
        log::info!(
            "🖼️ 图片已打开 - 尺寸: {}x{} 纹理: {}x{}",
            size.width,
            size.height,
            image.width(),
            image.height()
        );
    }

    fn image_failed(&self, _image: Option<&DecodedImage>) {
        log::warn!("⚠️ 图片打开失败");
    }
}
