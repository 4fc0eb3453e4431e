use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use qrlink_logging::{LevelFilter, LogTarget};

#[derive(Parser, Debug)]
#[command(name = "qrlink", version, about = "Turn a link into a downloadable QR code")]
pub struct Cli {
    /// RON configuration file. A missing file means defaults.
    #[arg(long, default_value = "qrlink.ron")]
    pub config: PathBuf,

    /// Directory downloads are written to (overrides the config file).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Generate a code for URL, download it, and exit.
    #[arg(long, value_name = "URL")]
    pub once: Option<String>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Log file used by `--log file` and `--log both`.
    #[arg(long, default_value = "qrlink.log")]
    pub log_file: PathBuf,

    /// Log verbosity (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info", value_parser = parse_level_filter)]
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDestination {
    File,
    /// Stderr, so the prompt on stdout stays readable.
    Terminal,
    Both,
}

impl Cli {
    pub fn log_target(&self) -> LogTarget {
        match self.log {
            LogDestination::File => LogTarget::File(self.log_file.clone()),
            LogDestination::Terminal => LogTarget::Terminal,
            LogDestination::Both => LogTarget::Both(self.log_file.clone()),
        }
    }
}

fn parse_level_filter(raw: &str) -> Result<LevelFilter, String> {
    raw.parse()
        .map_err(|_| format!("unknown log level {raw:?}"))
}
