use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::{anyhow, bail};
use qrlink_core::{update, AppState, AppViewModel, Msg, Phase, ENCODE_FAILED_MESSAGE};
use qrlink_logging::{qrlink_debug, qrlink_info};

use super::cli::Cli;
use super::config::load_config;
use super::effects::EffectRunner;
use super::ui;
use super::ui::input::{parse_line, UiCommand};

/// Everything the event loop reacts to, serialized onto one channel.
pub enum LoopEvent {
    Msg(Msg),
    Saved {
        filename: String,
        result: Result<PathBuf, String>,
    },
    Help,
    Unknown(String),
    InputClosed,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    if let Err(err) = qrlink_logging::init(&cli.log_target(), cli.log_level) {
        eprintln!("qrlink: continuing without logging: {err}");
    }

    let mut config = load_config(&cli.config);
    if let Some(dir) = cli.out_dir {
        config.download_dir = dir;
    }
    qrlink_info!(
        "Starting qrlink (debounce={}ms, download_dir={:?})",
        config.debounce_ms,
        config.download_dir
    );

    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(config.engine_config(), loop_tx.clone());
    let state = AppState::with_settings(config.controller_settings());

    let mut session = match cli.once {
        Some(payload) => {
            if payload.is_empty() {
                bail!("--once needs a non-empty payload");
            }
            loop_tx
                .send(LoopEvent::Msg(Msg::InputChanged(payload)))
                .map_err(|_| anyhow!("event loop closed before start"))?;
            Session::new(state, runner, Mode::Once, TerminalObserver)
        }
        None => {
            print_lines(&ui::layout::banner());
            spawn_input_reader(loop_tx.clone());
            Session::new(state, runner, Mode::Interactive, TerminalObserver)
        }
    };
    drop(loop_tx);

    for event in loop_rx {
        if !session.handle(event) {
            break;
        }
    }
    session.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Interactive,
    /// Download the first image, then exit.
    Once,
}

/// Receives every view the session publishes and every save outcome.
trait ViewObserver {
    fn view_changed(&mut self, view: &AppViewModel);
    fn saved(&mut self, filename: &str, result: &Result<PathBuf, String>);
}

struct TerminalObserver;

impl ViewObserver for TerminalObserver {
    fn view_changed(&mut self, view: &AppViewModel) {
        print_lines(&ui::render::render(view));
    }

    fn saved(&mut self, filename: &str, result: &Result<PathBuf, String>) {
        println!("{}", ui::render::render_saved(filename, result));
    }
}

struct Session<O: ViewObserver> {
    state: AppState,
    runner: EffectRunner,
    mode: Mode,
    observer: O,
    download_requested: bool,
    outcome: Option<anyhow::Result<()>>,
}

impl<O: ViewObserver> Session<O> {
    fn new(state: AppState, runner: EffectRunner, mode: Mode, observer: O) -> Self {
        Self {
            state,
            runner,
            mode,
            observer,
            download_requested: false,
            outcome: None,
        }
    }

    /// Returns `false` once the controller has been torn down.
    fn handle(&mut self, event: LoopEvent) -> bool {
        match event {
            LoopEvent::Msg(msg) => self.dispatch_msg(msg),
            LoopEvent::Saved { filename, result } => {
                self.observer.saved(&filename, &result);
                if self.mode == Mode::Once {
                    self.outcome = Some(
                        result
                            .map(|_| ())
                            .map_err(|err| anyhow!("saving {filename} failed: {err}")),
                    );
                    self.dispatch_msg(Msg::Teardown);
                }
            }
            LoopEvent::Help => print_lines(&ui::layout::help()),
            LoopEvent::Unknown(command) => {
                println!("Unknown command {command}; type {}", ui::constants::CMD_HELP);
            }
            LoopEvent::InputClosed => self.dispatch_msg(Msg::Teardown),
        }
        !self.state.is_torn_down()
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        qrlink_debug!("dispatch {}", describe(&msg));
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);

        if self.state.consume_dirty() && !self.state.is_torn_down() {
            let view = self.state.view();
            self.publish(&view);
        }
    }

    fn publish(&mut self, view: &AppViewModel) {
        self.observer.view_changed(view);

        if self.mode != Mode::Once {
            return;
        }
        match view.phase {
            Phase::Image if !self.download_requested => {
                self.download_requested = true;
                self.dispatch_msg(Msg::DownloadClicked);
            }
            Phase::Error => {
                self.outcome = Some(Err(anyhow!(ENCODE_FAILED_MESSAGE)));
                self.dispatch_msg(Msg::Teardown);
            }
            _ => {}
        }
    }

    fn finish(self) -> anyhow::Result<()> {
        qrlink_info!("Shutting down");
        self.outcome.unwrap_or(Ok(()))
    }
}

/// Payload-free message label for logs.
fn describe(msg: &Msg) -> String {
    match msg {
        Msg::InputChanged(text) => format!("InputChanged(len={})", text.len()),
        Msg::DebounceElapsed { request_id } => format!("DebounceElapsed({request_id})"),
        Msg::EncodeFinished { request_id, result } => {
            format!("EncodeFinished({request_id}, ok={})", result.is_ok())
        }
        Msg::DownloadClicked => "DownloadClicked".to_string(),
        Msg::Teardown => "Teardown".to_string(),
    }
}

fn spawn_input_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let event = match parse_line(&line) {
                UiCommand::Edit(text) => LoopEvent::Msg(Msg::InputChanged(text)),
                UiCommand::Clear => LoopEvent::Msg(Msg::InputChanged(String::new())),
                UiCommand::Download => LoopEvent::Msg(Msg::DownloadClicked),
                UiCommand::Help => LoopEvent::Help,
                UiCommand::Quit => LoopEvent::Msg(Msg::Teardown),
                UiCommand::Unknown(command) => LoopEvent::Unknown(command),
            };
            if loop_tx.send(event).is_err() {
                return;
            }
        }
        let _ = loop_tx.send(LoopEvent::InputClosed);
    });
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, Once};
    use std::time::{Duration, Instant};

    use pretty_assertions::assert_eq;
    use qrlink_core::ControllerSettings;
    use qrlink_engine::{
        EncodeError, EncodedQr, EngineHandle, ImageSink, QrEncoder, RenderOptions, SaveError,
    };

    use super::*;

    const WAIT: Duration = Duration::from_secs(5);

    fn init_logging() {
        static INIT: Once = Once::new();
        INIT.call_once(qrlink_logging::initialize_for_tests);
    }

    /// Records payloads and fails for `"bad"`.
    #[derive(Default)]
    struct FakeEncoder {
        payloads: Mutex<Vec<String>>,
    }

    impl QrEncoder for FakeEncoder {
        fn encode(&self, payload: &str, options: &RenderOptions) -> Result<EncodedQr, EncodeError> {
            self.payloads.lock().unwrap().push(payload.to_string());
            if payload == "bad" {
                return Err(EncodeError::TooLarge {
                    modules: 21,
                    margin: options.margin,
                    width: options.width,
                });
            }
            Ok(EncodedQr {
                png: payload.as_bytes().to_vec(),
                width: options.width,
                height: options.width,
                modules: 21,
            })
        }
    }

    #[derive(Default)]
    struct FakeSink {
        saved: Mutex<Vec<String>>,
    }

    impl ImageSink for FakeSink {
        fn save(&self, _png: &[u8], filename: &str) -> Result<PathBuf, SaveError> {
            self.saved.lock().unwrap().push(filename.to_string());
            Ok(PathBuf::from("/virtual").join(filename))
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        views: Vec<AppViewModel>,
        saves: Vec<String>,
    }

    impl ViewObserver for RecordingObserver {
        fn view_changed(&mut self, view: &AppViewModel) {
            self.views.push(view.clone());
        }

        fn saved(&mut self, filename: &str, _result: &Result<PathBuf, String>) {
            self.saves.push(filename.to_string());
        }
    }

    impl RecordingObserver {
        fn phases(&self) -> Vec<Phase> {
            self.views.iter().map(|view| view.phase).collect()
        }
    }

    struct Harness {
        session: Session<RecordingObserver>,
        loop_rx: mpsc::Receiver<LoopEvent>,
        encoder: Arc<FakeEncoder>,
        sink: Arc<FakeSink>,
    }

    impl Harness {
        fn new(mode: Mode, debounce: Duration) -> Self {
            init_logging();
            let encoder = Arc::new(FakeEncoder::default());
            let sink = Arc::new(FakeSink::default());
            let (engine, events) = EngineHandle::with_components(
                RenderOptions::default(),
                encoder.clone(),
                sink.clone(),
            );
            let (loop_tx, loop_rx) = mpsc::channel();
            let runner = EffectRunner::from_parts(engine, events, loop_tx);
            let state = AppState::with_settings(ControllerSettings {
                debounce,
                ..ControllerSettings::default()
            });
            Self {
                session: Session::new(state, runner, mode, RecordingObserver::default()),
                loop_rx,
                encoder,
                sink,
            }
        }

        fn send(&mut self, msg: Msg) -> bool {
            self.session.handle(LoopEvent::Msg(msg))
        }

        /// Feeds loop events into the session until `done` holds or the
        /// session tears down.
        fn pump_until(&mut self, done: impl Fn(&Session<RecordingObserver>) -> bool) {
            let deadline = Instant::now() + WAIT;
            while !done(&self.session) {
                let remaining = deadline.saturating_duration_since(Instant::now());
                let event = self
                    .loop_rx
                    .recv_timeout(remaining)
                    .expect("timed out waiting for a loop event");
                if !self.session.handle(event) {
                    return;
                }
            }
        }

        fn payloads(&self) -> Vec<String> {
            self.encoder.payloads.lock().unwrap().clone()
        }
    }

    #[test]
    fn once_mode_downloads_exactly_once_then_finishes() {
        let mut harness = Harness::new(Mode::Once, Duration::from_millis(10));

        assert!(harness.send(Msg::InputChanged("https://example.com".to_string())));
        harness.pump_until(|session| session.state.is_torn_down());

        assert_eq!(*harness.sink.saved.lock().unwrap(), vec!["qrcode.png".to_string()]);
        assert_eq!(harness.session.observer.saves, vec!["qrcode.png".to_string()]);
        assert_eq!(
            harness.session.observer.phases(),
            vec![Phase::AwaitingEncode, Phase::Image]
        );
        assert!(harness.session.finish().is_ok());
    }

    #[test]
    fn once_mode_encode_failure_finishes_with_error() {
        let mut harness = Harness::new(Mode::Once, Duration::from_millis(10));

        harness.send(Msg::InputChanged("bad".to_string()));
        harness.pump_until(|session| session.state.is_torn_down());

        assert!(harness.sink.saved.lock().unwrap().is_empty());
        assert_eq!(
            harness.session.observer.phases(),
            vec![Phase::AwaitingEncode, Phase::Error]
        );
        let err = harness.session.finish().unwrap_err();
        assert_eq!(err.to_string(), ENCODE_FAILED_MESSAGE);
    }

    #[test]
    fn teardown_view_is_never_published() {
        let mut harness = Harness::new(Mode::Interactive, Duration::from_secs(60));

        assert!(harness.send(Msg::InputChanged("x".to_string())));
        assert!(!harness.send(Msg::Teardown));
        assert!(!harness.send(Msg::InputChanged("y".to_string())));

        assert_eq!(harness.session.observer.phases(), vec![Phase::AwaitingEncode]);
        assert!(harness.payloads().is_empty());
        assert!(harness.session.finish().is_ok());
    }

    #[test]
    fn quick_retype_encodes_only_the_final_text() {
        let mut harness = Harness::new(Mode::Interactive, qrlink_core::DEFAULT_DEBOUNCE);

        harness.send(Msg::InputChanged("a".to_string()));
        std::thread::sleep(Duration::from_millis(100));
        harness.send(Msg::InputChanged("b".to_string()));
        harness.pump_until(|session| session.state.view().phase == Phase::Image);

        assert_eq!(harness.payloads(), vec!["b".to_string()]);
        let last = harness.session.observer.views.last().unwrap();
        assert_eq!(last.input, "b");
        assert_eq!(last.image.as_ref().map(|image| &image.png[..]), Some(&b"b"[..]));
        assert!(last.download_enabled);
    }
}
