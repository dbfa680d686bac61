//! # 获取状态机（ImageView 核心编排）
//!
//! ## 设计思路
//!
//! `ImageView` 是单个视图实例的控制对象，只在拥有线程上通过 `&mut self` 使用。
//! 每次来源变化、挂载或单色变化都汇入唯一入口 `try_open_image`：
//!
//! 1. 候选与已处理标记为同一引用 → 跳过
//! 2. 视图未挂载 → 跳过（挂载时重新调用）
//! 3. 立即把候选记为已处理标记
//! 4. 候选为空或没有内容 → 清空表面、请求重绘、取消待完成获取（`Idle`）
//! 5. 同步打开成功 → 应用图片、取消待完成获取（`Applied`）
//! 6. 否则 → 确保表面存在并清空，投递后台获取（`Fetching`）
//!
//! ## 实现思路
//!
//! - 后台获取用 `spawn_blocking` 执行 `ImageSource::open`，
//!   完成后把 `FetchCompletion` 投递到拥有线程的队列；
//!   拥有线程通过 `process_completions` / `next_completion` 取出并处理。
//! - 完成处理只接受“当前且未取消”的获取；结果为空且标记已清空时静默丢弃，
//!   其余情况（包括结果为空）都走应用流程，由表面状态决定成功或失败通知。

use std::sync::Arc;
use std::time::Instant;

use image::Rgba;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::config::{ImageViewConfig, PlacementMode};
use super::host::ViewHost;
use super::state::{AcquisitionPhase, AcquisitionState, FetchCompletion, FetchOutcome};
use crate::error::ViewError;
use crate::geometry::{ContentMode, HorizontalAlignment, Size, StretchMode, VerticalAlignment};
use crate::image_source::{DecodedImage, SourceHandle};
use crate::surface::{SurfaceAdapter, SurfaceFactory};

/// 图片视图控制对象。
pub struct ImageView {
    pub(super) config: ImageViewConfig,
    pub(super) host: Arc<dyn ViewHost>,
    surface_factory: Box<dyn SurfaceFactory>,
    runtime: Handle,
    pub(super) surface: Option<SurfaceAdapter>,
    pub(super) state: AcquisitionState,
    source: Option<SourceHandle>,
    pub(super) stretch: StretchMode,
    pub(super) horizontal_alignment: HorizontalAlignment,
    pub(super) vertical_alignment: VerticalAlignment,
    monochrome_color: Option<Rgba<u8>>,
    pub(super) bounds: Size,
    attached: bool,
    completion_tx: UnboundedSender<FetchCompletion>,
    completion_rx: UnboundedReceiver<FetchCompletion>,
    in_flight: usize,
}

impl ImageView {
    /// 创建视图，后台获取投递到 `runtime` 的阻塞线程池。
    pub fn new(
        config: ImageViewConfig,
        host: Arc<dyn ViewHost>,
        surface_factory: impl SurfaceFactory + 'static,
        runtime: Handle,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Self {
            stretch: config.stretch,
            horizontal_alignment: config.horizontal_alignment,
            vertical_alignment: config.vertical_alignment,
            config,
            host,
            surface_factory: Box::new(surface_factory),
            runtime,
            surface: None,
            state: AcquisitionState::default(),
            source: None,
            monochrome_color: None,
            bounds: Size::ZERO,
            attached: false,
            completion_tx,
            completion_rx,
            in_flight: 0,
        }
    }

    /// 使用当前线程所在的 tokio 运行时创建视图。
    pub fn on_current_runtime(
        config: ImageViewConfig,
        host: Arc<dyn ViewHost>,
        surface_factory: impl SurfaceFactory + 'static,
    ) -> Result<Self, ViewError> {
        let runtime = Handle::try_current().map_err(|e| ViewError::Runtime(e.to_string()))?;
        Ok(Self::new(config, host, surface_factory, runtime))
    }

    pub fn config(&self) -> &ImageViewConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&SourceHandle> {
        self.source.as_ref()
    }

    pub fn stretch(&self) -> StretchMode {
        self.stretch
    }

    pub fn monochrome_color(&self) -> Option<Rgba<u8>> {
        self.monochrome_color
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn phase(&self) -> AcquisitionPhase {
        self.state.phase
    }

    /// 表面当前是否显示图片。
    pub fn has_image(&self) -> bool {
        self.surface.as_ref().is_some_and(SurfaceAdapter::has_image)
    }

    /// 当前显示图片的固有尺寸，无图时为零。
    pub fn source_image_size(&self) -> Size {
        self.state.source_size
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn is_fetch_pending(&self) -> bool {
        self.state.has_pending()
    }

    /// 已投递但尚未取回完成消息的后台任务数（含已取消的）。
    pub fn fetches_in_flight(&self) -> usize {
        self.in_flight
    }

    // ---------- 入站：属性与生命周期 ----------

    pub fn set_source(&mut self, source: Option<SourceHandle>) {
        self.source = source;
        self.try_open_image();
    }

    pub fn set_stretch(&mut self, stretch: StretchMode) {
        let old = self.stretch;
        if old == stretch {
            return;
        }
        self.stretch = stretch;
        self.on_stretch_changed(old, stretch);
    }

    pub fn set_alignment(&mut self, horizontal: HorizontalAlignment, vertical: VerticalAlignment) {
        self.horizontal_alignment = horizontal;
        self.vertical_alignment = vertical;
        self.update_layer_rect();
    }

    /// 视图边界变化。
    pub fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
        self.update_layer_rect();
    }

    /// 挂载到视图树：补做挂载前被跳过的获取。
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.attached = true;
        log::debug!("🔗 视图已挂载");
        self.try_open_image();
        self.update_layer_rect();
    }

    /// 从视图树卸载：取消进行中的获取，并让下次挂载重新处理同一来源。
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;

        if self.state.has_pending() {
            self.state.cancel_pending();
            self.state.clear_marker();
            self.state.phase = AcquisitionPhase::Idle;
        }
        log::debug!("🔌 视图已卸载");
    }

    /// 单色变化：对当前来源重新走一次获取，使重着色生效。
    pub fn set_monochrome_color(&mut self, color: Option<Rgba<u8>>) {
        if self.monochrome_color == color {
            return;
        }
        self.monochrome_color = color;
        self.state.clear_marker();
        self.try_open_image();
    }

    /// 拉伸策略变化的观察者回调。
    fn on_stretch_changed(&mut self, old: StretchMode, new: StretchMode) {
        log::debug!("↔️ 拉伸策略变化：{} -> {}", old, new);

        match self.config.placement {
            PlacementMode::Legacy => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.set_content_mode(ContentMode::from(new));
                }
            }
            PlacementMode::Precise => {
                self.update_layer_rect();
            }
        }
        self.host.request_layout();
    }

    // ---------- 获取状态机 ----------

    /// 获取入口，所有来源相关的状态转换都从这里开始。
    pub fn try_open_image(&mut self) {
        let candidate = self.source.clone();

        if self.state.is_processed(&candidate) {
            log::trace!("来源未变化，跳过");
            return;
        }

        if !self.attached {
            log::debug!("视图未挂载，推迟获取");
            return;
        }

        self.state.mark_processed(candidate.clone());

        let Some(source) = candidate.filter(|source| source.has_source()) else {
            if let Some(surface) = self.surface.as_mut() {
                surface.reset();
            }
            self.state.source_size = Size::ZERO;
            self.host.request_redisplay();
            self.state.cancel_pending();
            self.state.phase = AcquisitionPhase::Idle;
            log::debug!("🧹 来源为空，已清空表面");
            return;
        };

        self.state.phase = AcquisitionPhase::Opening;
        let open_start = Instant::now();
        if let Some(image) = source.try_open_sync() {
            log::debug!(
                "⚡ 同步打开成功 - {} open_sync={}ms",
                source.describe(),
                open_start.elapsed().as_millis()
            );
            self.apply_decoded_image(Some(image));
            self.state.cancel_pending();
            return;
        }

        let surface = self.ensure_surface();
        surface.reset();
        self.state.source_size = Size::ZERO;
        self.state.phase = AcquisitionPhase::Fetching;
        self.schedule_fetch(source.describe());
    }

    fn schedule_fetch(&mut self, description: String) {
        let fetch = self.state.begin_fetch();
        let marker = self.state.shared_marker();
        let completion_tx = self.completion_tx.clone();
        let id = fetch.id;
        let token = fetch.token;

        log::debug!("🚚 投递后台获取 #{} - {}", id, description);

        self.in_flight += 1;
        self.runtime.spawn_blocking(move || {
            let fetch_start = Instant::now();

            let result = match marker.snapshot() {
                Some(source) if !token.is_cancelled() => source.open(&token),
                _ => None,
            };

            log::debug!(
                "📦 后台获取 #{} 结束 - fetch={}ms has_image={} cancelled={}",
                id,
                fetch_start.elapsed().as_millis(),
                result.is_some(),
                token.is_cancelled()
            );

            if completion_tx.send(FetchCompletion { id, result }).is_err() {
                log::debug!("视图已释放，丢弃后台获取 #{} 的结果", id);
            }
        });
    }

    /// 非阻塞地处理所有已到达的后台获取结果。
    pub fn process_completions(&mut self) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            outcomes.push(self.complete_fetch(completion));
        }
        outcomes
    }

    /// 等待下一个后台获取结果并处理；没有在途任务时立即返回 `None`。
    pub async fn next_completion(&mut self) -> Option<FetchOutcome> {
        if self.in_flight == 0 {
            return None;
        }

        let completion = self.completion_rx.recv().await?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(self.complete_fetch(completion))
    }

    fn complete_fetch(&mut self, completion: FetchCompletion) -> FetchOutcome {
        if !self
            .state
            .accept_completion(completion.id, completion.result.is_some())
        {
            return FetchOutcome::Discarded;
        }

        self.apply_decoded_image(completion.result)
    }

    /// 应用解码结果：单色重着色 → 交给表面 → 刷新尺寸与布局 → 触发通知。
    fn apply_decoded_image(&mut self, image: Option<DecodedImage>) -> FetchOutcome {
        let apply_start = Instant::now();

        let image = match (image, self.monochrome_color) {
            (Some(image), Some(color)) => Some(image.recolored(color)),
            (image, _) => image,
        };

        let surface = self.ensure_surface();
        surface.set_image(image.as_ref());
        let has_image = surface.has_image();
        let image_size = surface.image_size();
        self.state.source_size = image_size;

        self.host.request_layout();
        self.update_layer_rect();

        log::debug!(
            "🎨 应用解码结果 - has_image={} apply={}ms",
            has_image,
            apply_start.elapsed().as_millis()
        );

        match image {
            Some(image) if has_image => {
                self.state.phase = AcquisitionPhase::Applied;
                self.host.image_opened(&image);
                FetchOutcome::Opened
            }
            image => {
                self.state.phase = AcquisitionPhase::Failed;
                self.host.image_failed(image.as_ref());
                FetchOutcome::Failed
            }
        }
    }

    /// 懒创建表面；旧版模式下创建时同步一次内容模式。
    fn ensure_surface(&mut self) -> &mut SurfaceAdapter {
        let factory = &self.surface_factory;
        let legacy = self.config.placement == PlacementMode::Legacy;
        let stretch = self.stretch;

        self.surface.get_or_insert_with(|| {
            log::debug!("🧱 创建原生表面（legacy={}）", legacy);
            let mut adapter = SurfaceAdapter::new(factory.create_surface());
            if legacy {
                adapter.set_content_mode(ContentMode::from(stretch));
            }
            adapter
        })
    }
}
