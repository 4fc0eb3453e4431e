use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use qrlink_logging::qrlink_info;
use tempfile::NamedTempFile;
use thiserror::Error;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("filename must be a bare file name: {0:?}")]
    InvalidFilename(String),
    #[error("refusing to save data without a PNG signature")]
    NotPng,
    #[error("download path {0:?} exists and is not a directory")]
    NotADirectory(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Destination for a downloaded QR image.
pub trait ImageSink: Send + Sync {
    fn save(&self, png: &[u8], filename: &str) -> Result<PathBuf, SaveError>;
}

/// Saves PNGs into one downloads directory, creating it on first use.
///
/// The image is staged in a temp file next to the target and renamed over it,
/// so an existing `qrcode.png` is either fully replaced or left untouched.
pub struct DownloadDirSink {
    dir: PathBuf,
}

impl DownloadDirSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn prepare_dir(&self) -> Result<(), SaveError> {
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(SaveError::NotADirectory(self.dir.clone())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.dir)?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl ImageSink for DownloadDirSink {
    fn save(&self, png: &[u8], filename: &str) -> Result<PathBuf, SaveError> {
        if !is_bare_filename(filename) {
            return Err(SaveError::InvalidFilename(filename.to_string()));
        }
        if !png.starts_with(&PNG_SIGNATURE) {
            return Err(SaveError::NotPng);
        }
        self.prepare_dir()?;

        let target = self.dir.join(filename);
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(png)?;
        staged.as_file().sync_all()?;
        staged.persist(&target).map_err(|e| SaveError::Io(e.error))?;

        qrlink_info!("Saved {} bytes to {:?}", png.len(), target);
        Ok(target)
    }
}

fn is_bare_filename(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}
