#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use image_view::image_source::{DecodedImage, ImageSource, SourceHandle};
use image_view::view::ViewHost;
use tokio_util::sync::CancellationToken;

pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Layout,
    Redisplay,
    Opened(u32, u32),
    Failed,
}

/// 记录所有宿主回调的测试宿主。
#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, event: HostEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<(u32, u32)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Opened(w, h) => Some((w, h)),
                _ => None,
            })
            .collect()
    }

    pub fn failed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == HostEvent::Failed)
            .count()
    }

    pub fn count(&self, wanted: &HostEvent) -> usize {
        self.events().iter().filter(|event| *event == wanted).count()
    }
}

impl ViewHost for RecordingHost {
    fn request_layout(&self) {
        self.push(HostEvent::Layout);
    }

    fn request_redisplay(&self) {
        self.push(HostEvent::Redisplay);
    }

    fn image_opened(&self, image: &DecodedImage) {
        let size = image.size();
        self.push(HostEvent::Opened(size.width as u32, size.height as u32));
    }

    fn image_failed(&self, _image: Option<&DecodedImage>) {
        self.push(HostEvent::Failed);
    }
}

/// 释放闸门：丢弃发送端后，所有等待者立即放行。
pub struct Gate(Mutex<Option<Sender<()>>>);

impl Gate {
    pub fn release(&self) {
        self.0.lock().unwrap().take();
    }
}

/// 行为可编排的来源。
pub struct ScriptedSource {
    has_source: bool,
    sync_result: Option<DecodedImage>,
    async_result: Option<DecodedImage>,
    gate: Option<Mutex<Receiver<()>>>,
    opens: AtomicUsize,
}

impl ScriptedSource {
    fn build(has_source: bool, sync_result: Option<DecodedImage>, async_result: Option<DecodedImage>) -> Self {
        Self {
            has_source,
            sync_result,
            async_result,
            gate: None,
            opens: AtomicUsize::new(0),
        }
    }

    /// 没有内容的来源。
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::build(false, None, None))
    }

    /// 只能在后台打开的来源，立即返回 `result`。
    pub fn fetching(result: Option<DecodedImage>) -> Arc<Self> {
        Arc::new(Self::build(true, None, result))
    }

    /// 只能在后台打开的来源，直到闸门释放才返回 `result`。
    pub fn gated(result: Option<DecodedImage>) -> (Arc<Self>, Gate) {
        let (tx, rx) = mpsc::channel();
        let mut source = Self::build(true, None, result);
        source.gate = Some(Mutex::new(rx));
        (Arc::new(source), Gate(Mutex::new(Some(tx))))
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl ImageSource for ScriptedSource {
    fn has_source(&self) -> bool {
        self.has_source
    }

    fn try_open_sync(&self) -> Option<DecodedImage> {
        self.sync_result.clone()
    }

    fn open(&self, cancel: &CancellationToken) -> Option<DecodedImage> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let _ = gate.lock().unwrap().recv();
        }
        if cancel.is_cancelled() {
            return None;
        }
        self.async_result.clone()
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

pub fn handle(source: &Arc<ScriptedSource>) -> SourceHandle {
    SourceHandle::from_arc(source.clone())
}

pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> DecodedImage {
    DecodedImage::new(RgbaImage::from_pixel(width, height, color))
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, RED);
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("failed to encode test image");
    cursor.into_inner()
}
