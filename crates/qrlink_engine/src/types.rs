use std::path::PathBuf;

use crate::{EncodeError, HexColor, SaveError};

pub type RequestId = u64;

/// Fixed rendering configuration handed to the encoder on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Target side length of the square image, in pixels.
    pub width: u32,
    /// Quiet zone around the symbol, in modules.
    pub margin: u32,
    pub dark: HexColor,
    pub light: HexColor,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 400,
            margin: 2,
            dark: HexColor::BLACK,
            light: HexColor::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedQr {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Modules per side of the symbol, excluding the margin.
    pub modules: u32,
}

#[derive(Debug)]
pub enum EngineEvent {
    DebounceElapsed {
        request_id: RequestId,
    },
    EncodeCompleted {
        request_id: RequestId,
        result: Result<EncodedQr, EncodeError>,
    },
    SaveCompleted {
        filename: String,
        result: Result<PathBuf, SaveError>,
    },
}
