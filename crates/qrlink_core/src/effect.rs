use std::time::Duration;

use crate::{QrImage, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm the single debounce timer, replacing any timer already armed.
    ArmDebounce { request_id: RequestId, delay: Duration },
    /// Cancel the armed debounce timer, if any.
    CancelDebounce,
    /// Run the external encoder on the captured payload.
    Encode { request_id: RequestId, payload: String },
    /// Hand the published image to the file-save capability.
    SaveImage { image: QrImage, filename: String },
}
