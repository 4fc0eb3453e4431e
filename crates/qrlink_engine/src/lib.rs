//! qrlink engine: timers, QR encoding and file saving behind the core's effects.
mod color;
mod debounce;
mod encoder;
mod engine;
mod sink;
mod types;

pub use color::{ColorParseError, HexColor};
pub use debounce::Debouncer;
pub use encoder::{EncodeError, PngQrEncoder, QrEncoder, MAX_SIDE};
pub use engine::{EngineConfig, EngineEvents, EngineHandle};
pub use sink::{DownloadDirSink, ImageSink, SaveError};
pub use types::{EncodedQr, EngineEvent, RenderOptions, RequestId};
