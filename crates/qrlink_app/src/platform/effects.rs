use std::sync::mpsc;
use std::thread;

use qrlink_core::{Effect, EncodeFailure, Msg, QrImage};
use qrlink_engine::{
    EncodeError, EncodedQr, EngineConfig, EngineEvent, EngineEvents, EngineHandle,
};
use qrlink_logging::{qrlink_debug, qrlink_info, qrlink_warn};

use super::app::LoopEvent;

/// Executes core effects on the engine and feeds engine events back into the
/// event loop.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, loop_tx: mpsc::Sender<LoopEvent>) -> Self {
        let (engine, events) = EngineHandle::new(config);
        Self::from_parts(engine, events, loop_tx)
    }

    /// Runs effects on an already-built engine, forwarding its events.
    pub fn from_parts(
        engine: EngineHandle,
        events: EngineEvents,
        loop_tx: mpsc::Sender<LoopEvent>,
    ) -> Self {
        spawn_event_loop(events, loop_tx);
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ArmDebounce { request_id, delay } => {
                    qrlink_debug!("ArmDebounce request_id={} delay={:?}", request_id, delay);
                    self.engine.arm_debounce(request_id, delay);
                }
                Effect::CancelDebounce => {
                    qrlink_debug!("CancelDebounce");
                    self.engine.cancel_debounce();
                }
                Effect::Encode {
                    request_id,
                    payload,
                } => {
                    qrlink_info!(
                        "Encode request_id={} payload_len={}",
                        request_id,
                        payload.len()
                    );
                    self.engine.encode(request_id, payload);
                }
                Effect::SaveImage { image, filename } => {
                    qrlink_info!("SaveImage filename={} bytes={}", filename, image.png.len());
                    self.engine.save(image.png, filename);
                }
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            let forwarded = match event {
                EngineEvent::DebounceElapsed { request_id } => {
                    LoopEvent::Msg(Msg::DebounceElapsed { request_id })
                }
                EngineEvent::EncodeCompleted { request_id, result } => {
                    LoopEvent::Msg(Msg::EncodeFinished {
                        request_id,
                        result: map_encode_result(request_id, result),
                    })
                }
                EngineEvent::SaveCompleted { filename, result } => LoopEvent::Saved {
                    filename,
                    result: result.map_err(|err| err.to_string()),
                },
            };
            if loop_tx.send(forwarded).is_err() {
                break;
            }
        }
    });
}

fn map_encode_result(
    request_id: u64,
    result: Result<EncodedQr, EncodeError>,
) -> Result<QrImage, EncodeFailure> {
    match result {
        Ok(qr) => Ok(QrImage::new(qr.png, qr.width, qr.height)),
        Err(err) => {
            qrlink_warn!("Request {} failed: {}", request_id, err);
            Err(EncodeFailure::new(err.to_string()))
        }
    }
}
