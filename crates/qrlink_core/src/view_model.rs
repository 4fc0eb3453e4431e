use crate::QrImage;

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Empty,
    /// A request for the current input is debouncing or encoding.
    AwaitingEncode,
    Image,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub phase: Phase,
    /// Last published image. Stays visible while a newer request is pending.
    pub image: Option<QrImage>,
    pub error: Option<String>,
    pub download_enabled: bool,
    pub dirty: bool,
}
