//! # 获取状态模块
//!
//! ## 设计思路
//!
//! 把视图实例上所有可变的获取状态收拢到一个小结构体 `AcquisitionState`：
//! 已处理标记、待完成获取、缓存的固有尺寸与当前阶段。
//! 所有转换都经由视图的 `try_open_image` / 完成处理两个入口，
//! 不依赖字段写入的偶然顺序来保证“丢弃过期结果”。
//!
//! ## 实现思路
//!
//! - 已处理标记通过 `SharedMarker`（`Arc<RwLock<..>>`）共享给后台任务，
//!   只有拥有线程写入，后台任务只读快照。
//! - 任一时刻至多一个 `PendingFetch`；开始新的获取会先取消旧的。

use std::sync::{Arc, RwLock};

use tokio_util::sync::CancellationToken;

use crate::geometry::Size;
use crate::image_source::{DecodedImage, SourceHandle};

/// 获取阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquisitionPhase {
    /// 无来源，表面已清空。
    #[default]
    Idle,
    /// 正在同步尝试打开。
    Opening,
    /// 已投递后台获取，可取消。
    Fetching,
    /// 图片已交给表面。
    Applied,
    /// 来源存在但没有得到可用图片。
    Failed,
}

/// 一次后台获取完成后的处理结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Opened,
    Failed,
    /// 已取消、已被新获取取代，或来源在获取期间被清空。
    Discarded,
}

/// 待完成的后台获取。
#[derive(Debug, Clone)]
pub(crate) struct PendingFetch {
    pub(crate) id: u64,
    pub(crate) token: CancellationToken,
}

/// 后台任务投递回拥有线程的延续。
#[derive(Debug)]
pub(crate) struct FetchCompletion {
    pub(crate) id: u64,
    pub(crate) result: Option<DecodedImage>,
}

/// 已处理标记的共享单元。
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedMarker(Arc<RwLock<Option<SourceHandle>>>);

impl SharedMarker {
    /// 读取一次原子快照。
    pub(crate) fn snapshot(&self) -> Option<SourceHandle> {
        match self.0.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                log::warn!("已处理标记读锁中毒，继续使用恢复数据");
                poisoned.into_inner().clone()
            }
        }
    }

    fn store(&self, marker: Option<SourceHandle>) {
        match self.0.write() {
            Ok(mut guard) => *guard = marker,
            Err(poisoned) => {
                log::warn!("已处理标记写锁中毒，继续使用恢复数据");
                *poisoned.into_inner() = marker;
            }
        }
    }
}

/// 视图实例独占的获取状态。
#[derive(Debug, Default)]
pub(crate) struct AcquisitionState {
    marker: SharedMarker,
    pending: Option<PendingFetch>,
    next_fetch_id: u64,
    pub(crate) source_size: Size,
    pub(crate) phase: AcquisitionPhase,
}

impl AcquisitionState {
    pub(crate) fn shared_marker(&self) -> SharedMarker {
        self.marker.clone()
    }

    pub(crate) fn marker(&self) -> Option<SourceHandle> {
        self.marker.snapshot()
    }

    /// 候选与已处理标记是否为同一引用（两者都为空也算相同）。
    pub(crate) fn is_processed(&self, candidate: &Option<SourceHandle>) -> bool {
        self.marker.snapshot() == *candidate
    }

    pub(crate) fn mark_processed(&mut self, candidate: Option<SourceHandle>) {
        self.marker.store(candidate);
    }

    pub(crate) fn clear_marker(&mut self) {
        self.marker.store(None);
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// 开始新的获取：取消并替换旧的待完成获取。
    pub(crate) fn begin_fetch(&mut self) -> PendingFetch {
        self.cancel_pending();

        self.next_fetch_id += 1;
        let fetch = PendingFetch {
            id: self.next_fetch_id,
            token: CancellationToken::new(),
        };
        self.pending = Some(fetch.clone());
        fetch
    }

    /// 取消并清除待完成获取。
    pub(crate) fn cancel_pending(&mut self) {
        if let Some(fetch) = self.pending.take() {
            fetch.token.cancel();
            log::debug!("⏹️ 已取消后台获取 #{}", fetch.id);
        }
    }

    /// 仅当 `id` 是当前待完成获取且未取消时取出它。
    pub(crate) fn take_current(&mut self, id: u64) -> Option<PendingFetch> {
        match &self.pending {
            Some(fetch) if fetch.id == id && !fetch.token.is_cancelled() => self.pending.take(),
            _ => None,
        }
    }

    /// 完成守卫：结果是否可以应用。
    ///
    /// 过期或已取消的获取一律拒绝；空结果只有在已处理标记仍存在时才接受，
    /// 此时它表示解码失败。标记为空而获取仍是当前的情况只会出现在
    /// 绕过 `cancel_pending` 直接 `clear_marker` 时，视图自身不会这样组合调用。
    pub(crate) fn accept_completion(&mut self, id: u64, has_result: bool) -> bool {
        if self.take_current(id).is_none() {
            log::debug!("🗑️ 丢弃过期的后台获取 #{}", id);
            return false;
        }
        if !has_result && self.marker().is_none() {
            log::debug!("🗑️ 来源已清空，丢弃后台获取 #{}", id);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_source::DecodedSource;
    use image::RgbaImage;

    fn handle() -> SourceHandle {
        SourceHandle::new(DecodedSource::new(DecodedImage::new(RgbaImage::new(1, 1))))
    }

    #[test]
    fn empty_marker_matches_empty_candidate() {
        let state = AcquisitionState::default();

        assert!(state.is_processed(&None));
        assert!(!state.is_processed(&Some(handle())));
    }

    #[test]
    fn marker_is_visible_through_shared_snapshot() {
        let mut state = AcquisitionState::default();
        let shared = state.shared_marker();
        let source = handle();

        state.mark_processed(Some(source.clone()));
        assert_eq!(shared.snapshot(), Some(source));

        state.clear_marker();
        assert!(shared.snapshot().is_none());
    }

    #[test]
    fn begin_fetch_cancels_previous() {
        let mut state = AcquisitionState::default();

        let first = state.begin_fetch();
        let second = state.begin_fetch();

        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());
        assert!(state.take_current(first.id).is_none());
        assert!(state.take_current(second.id).is_some());
        assert!(!state.has_pending());
    }

    #[test]
    fn cancelled_pending_cannot_be_taken() {
        let mut state = AcquisitionState::default();
        let fetch = state.begin_fetch();

        fetch.token.cancel();

        assert!(state.take_current(fetch.id).is_none());
    }

    #[test]
    fn completion_guard_rejects_stale_ids() {
        let mut state = AcquisitionState::default();
        state.mark_processed(Some(handle()));
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        assert!(!state.accept_completion(first.id, true));
        assert!(state.accept_completion(second.id, true));
        assert!(!state.has_pending());
    }

    #[test]
    fn empty_result_is_a_failure_while_marker_is_set() {
        let mut state = AcquisitionState::default();
        state.mark_processed(Some(handle()));
        let fetch = state.begin_fetch();

        assert!(state.accept_completion(fetch.id, false));
    }

    #[test]
    fn empty_result_is_discarded_once_marker_is_cleared() {
        let mut state = AcquisitionState::default();
        state.mark_processed(Some(handle()));
        let fetch = state.begin_fetch();

        state.clear_marker();

        assert!(!state.accept_completion(fetch.id, false));
        assert!(!state.has_pending());
    }
}
