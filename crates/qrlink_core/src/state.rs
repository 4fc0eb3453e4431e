use std::sync::Arc;
use std::time::Duration;

use crate::view_model::{AppViewModel, Phase};

pub type RequestId = u64;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_FILENAME: &str = "qrcode.png";
pub const ENCODE_FAILED_MESSAGE: &str = "Failed to generate QR code";

/// An encoded QR code ready to be displayed or saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    pub png: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

impl QrImage {
    pub fn new(png: impl Into<Arc<[u8]>>, width: u32, height: u32) -> Self {
        Self {
            png: png.into(),
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderResult {
    #[default]
    Empty,
    Image(QrImage),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub debounce: Duration,
    pub filename: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestStage {
    /// Timer armed, not yet fired.
    Debouncing,
    /// Timer fired, encoder running.
    Encoding,
}

/// The single request the controller currently cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingRequest {
    pub(crate) id: RequestId,
    pub(crate) payload: String,
    pub(crate) stage: RequestStage,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    settings: ControllerSettings,
    input: String,
    result: RenderResult,
    pending: Option<PendingRequest>,
    next_request_id: RequestId,
    torn_down: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ControllerSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn result(&self) -> &RenderResult {
        &self.result
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Id of the request whose outcome will be published next, if any.
    pub fn current_request(&self) -> Option<RequestId> {
        self.pending.as_ref().map(|pending| pending.id)
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            return Phase::AwaitingEncode;
        }
        match self.result {
            RenderResult::Empty => Phase::Empty,
            RenderResult::Image(_) => Phase::Image,
            RenderResult::Error(_) => Phase::Error,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let (image, error) = match &self.result {
            RenderResult::Empty => (None, None),
            RenderResult::Image(image) => (Some(image.clone()), None),
            RenderResult::Error(message) => (None, Some(message.clone())),
        };
        AppViewModel {
            input: self.input.clone(),
            phase: self.phase(),
            download_enabled: image.is_some(),
            image,
            error,
            dirty: self.dirty,
        }
    }

    /// Returns whether observers need a fresh view, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        self.input = text;
        self.mark_dirty();
    }

    pub(crate) fn set_result(&mut self, result: RenderResult) {
        if self.result != result {
            self.result = result;
            self.mark_dirty();
        }
    }

    pub(crate) fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    pub(crate) fn take_pending(&mut self) -> Option<PendingRequest> {
        self.pending.take()
    }

    /// Captures `payload` under a fresh request id and returns that id.
    pub(crate) fn begin_request(&mut self, payload: String) -> RequestId {
        self.next_request_id += 1;
        let id = self.next_request_id;
        self.pending = Some(PendingRequest {
            id,
            payload,
            stage: RequestStage::Debouncing,
        });
        id
    }

    /// Moves the matching request from debouncing to encoding, returning the
    /// captured payload. A stale or already-fired id yields `None`.
    pub(crate) fn start_encoding(&mut self, id: RequestId) -> Option<String> {
        let pending = self.pending.as_mut()?;
        if pending.id != id || pending.stage != RequestStage::Debouncing {
            return None;
        }
        pending.stage = RequestStage::Encoding;
        Some(pending.payload.clone())
    }

    /// Removes the matching in-flight request. Stale completions yield `false`.
    pub(crate) fn finish_encoding(&mut self, id: RequestId) -> bool {
        match &self.pending {
            Some(pending) if pending.id == id && pending.stage == RequestStage::Encoding => {
                self.pending = None;
                // Leaving AwaitingEncode is observable even if the result repeats.
                self.mark_dirty();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn tear_down(&mut self) {
        self.torn_down = true;
        self.pending = None;
        self.mark_dirty();
    }
}
