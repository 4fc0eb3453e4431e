//! qrlink core: pure input-to-image state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{EncodeFailure, Msg};
pub use state::{
    AppState, ControllerSettings, QrImage, RenderResult, RequestId, DEFAULT_DEBOUNCE,
    DEFAULT_FILENAME, ENCODE_FAILED_MESSAGE,
};
pub use update::update;
pub use view_model::{AppViewModel, Phase};
