#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box.
    InputChanged(String),
    /// The debounce timer armed for `request_id` expired.
    DebounceElapsed { request_id: crate::RequestId },
    /// Encoder completion for a dispatched request.
    EncodeFinished {
        request_id: crate::RequestId,
        result: Result<crate::QrImage, EncodeFailure>,
    },
    /// User clicked Download.
    DownloadClicked,
    /// The component is going away.
    Teardown,
}

/// Encoder rejection. The detail is for diagnostics only; the view always
/// shows [`crate::ENCODE_FAILED_MESSAGE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeFailure {
    pub detail: String,
}

impl EncodeFailure {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
