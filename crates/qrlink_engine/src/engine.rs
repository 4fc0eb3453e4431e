use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use qrlink_logging::{qrlink_debug, qrlink_error, qrlink_info, qrlink_warn};
use tokio::runtime::Runtime;

use crate::debounce::Debouncer;
use crate::encoder::{PngQrEncoder, QrEncoder};
use crate::sink::{DownloadDirSink, ImageSink};
use crate::{EngineEvent, RenderOptions, RequestId};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub render: RenderOptions,
    pub download_dir: PathBuf,
}

impl EngineConfig {
    pub fn default_with_download_dir(download_dir: PathBuf) -> Self {
        Self {
            render: RenderOptions::default(),
            download_dir,
        }
    }
}

enum EngineCommand {
    ArmDebounce {
        request_id: RequestId,
        delay: Duration,
    },
    CancelDebounce,
    Encode {
        request_id: RequestId,
        payload: String,
    },
    Save {
        png: Arc<[u8]>,
        filename: String,
    },
}

/// Command side of the engine. Dropping it stops the engine thread, which
/// cancels any armed timer.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Event side of the engine.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    /// Blocks until the next event; `None` once the engine has stopped.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

struct Components {
    render: RenderOptions,
    encoder: Arc<dyn QrEncoder>,
    sink: Arc<dyn ImageSink>,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> (Self, EngineEvents) {
        Self::with_components(
            config.render,
            Arc::new(PngQrEncoder),
            Arc::new(DownloadDirSink::new(config.download_dir)),
        )
    }

    pub fn with_components(
        render: RenderOptions,
        encoder: Arc<dyn QrEncoder>,
        sink: Arc<dyn ImageSink>,
    ) -> (Self, EngineEvents) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let components = Components {
            render,
            encoder,
            sink,
            event_tx,
        };

        thread::spawn(move || {
            let runtime = match Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    qrlink_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut debouncer = Debouncer::new(runtime.handle().clone());
            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &mut debouncer, &components, command);
            }
            debouncer.cancel();
            qrlink_debug!("Engine command channel closed; shutting down");
        });

        (Self { cmd_tx }, EngineEvents { event_rx })
    }

    pub fn arm_debounce(&self, request_id: RequestId, delay: Duration) {
        self.send(EngineCommand::ArmDebounce { request_id, delay });
    }

    pub fn cancel_debounce(&self) {
        self.send(EngineCommand::CancelDebounce);
    }

    pub fn encode(&self, request_id: RequestId, payload: impl Into<String>) {
        self.send(EngineCommand::Encode {
            request_id,
            payload: payload.into(),
        });
    }

    pub fn save(&self, png: Arc<[u8]>, filename: impl Into<String>) {
        self.send(EngineCommand::Save {
            png,
            filename: filename.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            qrlink_warn!("Engine thread is gone; command dropped");
        }
    }
}

fn handle_command(
    runtime: &Runtime,
    debouncer: &mut Debouncer,
    components: &Components,
    command: EngineCommand,
) {
    match command {
        EngineCommand::ArmDebounce { request_id, delay } => {
            if debouncer.cancel() {
                qrlink_debug!("Previous timer superseded by request {}", request_id);
            }
            let event_tx = components.event_tx.clone();
            debouncer.arm(delay, move || {
                qrlink_debug!("Debounce elapsed for request {}", request_id);
                let _ = event_tx.send(EngineEvent::DebounceElapsed { request_id });
            });
        }
        EngineCommand::CancelDebounce => {
            if debouncer.cancel() {
                qrlink_debug!("Cancelled pending timer");
            }
        }
        EngineCommand::Encode {
            request_id,
            payload,
        } => {
            let encoder = components.encoder.clone();
            let render = components.render.clone();
            let event_tx = components.event_tx.clone();
            runtime.spawn_blocking(move || {
                let result = encoder.encode(&payload, &render);
                match &result {
                    Ok(qr) => qrlink_info!(
                        "Encoded request {} ({} modules, {} byte png)",
                        request_id,
                        qr.modules,
                        qr.png.len()
                    ),
                    Err(err) => qrlink_error!(
                        "QR encode failed for request {} (payload_len={}): {}",
                        request_id,
                        payload.len(),
                        err
                    ),
                }
                let _ = event_tx.send(EngineEvent::EncodeCompleted { request_id, result });
            });
        }
        EngineCommand::Save { png, filename } => {
            let sink = components.sink.clone();
            let event_tx = components.event_tx.clone();
            runtime.spawn_blocking(move || {
                let result = sink.save(&png, &filename);
                if let Err(err) = &result {
                    qrlink_error!("Failed to save {}: {}", filename, err);
                }
                let _ = event_tx.send(EngineEvent::SaveCompleted { filename, result });
            });
        }
    }
}
