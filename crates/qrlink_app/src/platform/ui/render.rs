use qrlink_core::{AppViewModel, Phase};

use super::constants::*;

pub fn render(view: &AppViewModel) -> Vec<String> {
    let input_line = if view.input.is_empty() {
        "Input: (empty)".to_string()
    } else {
        format!("Input: {}", view.input)
    };

    let status_line = match view.phase {
        Phase::Empty => PLACEHOLDER.to_string(),
        Phase::AwaitingEncode => match (&view.image, &view.error) {
            (Some(_), _) => "Generating QR code... (previous code still shown)".to_string(),
            (None, Some(error)) => format!("Generating QR code... (last attempt: {error})"),
            (None, None) => "Generating QR code...".to_string(),
        },
        Phase::Image => match &view.image {
            Some(image) => format!(
                "QR code ready: {}x{} PNG, {} bytes",
                image.width,
                image.height,
                image.png.len()
            ),
            None => PLACEHOLDER.to_string(),
        },
        Phase::Error => view.error.clone().unwrap_or_default(),
    };

    let download_line = if view.download_enabled {
        format!("[{DOWNLOAD_LABEL}] available, type {CMD_DOWNLOAD}")
    } else {
        format!("[{DOWNLOAD_LABEL}] disabled")
    };

    vec![input_line, status_line, download_line]
}

pub fn render_saved(filename: &str, result: &Result<std::path::PathBuf, String>) -> String {
    match result {
        Ok(path) => format!("Saved {} to {}", filename, path.display()),
        Err(err) => format!("Could not save {filename}: {err}"),
    }
}
