use super::constants::*;

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Replace the input text. A blank line clears it.
    Edit(String),
    Download,
    Clear,
    Help,
    Quit,
    Unknown(String),
}

/// Lines starting with `:` are commands; `::` escapes a literal leading colon.
/// Everything else is passed through untouched apart from the line terminator.
pub fn parse_line(line: &str) -> UiCommand {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    if let Some(rest) = line.strip_prefix("::") {
        return UiCommand::Edit(format!(":{rest}"));
    }
    if !line.starts_with(':') {
        return UiCommand::Edit(line.to_string());
    }
    match line.trim_end() {
        CMD_DOWNLOAD => UiCommand::Download,
        CMD_CLEAR => UiCommand::Clear,
        CMD_HELP => UiCommand::Help,
        CMD_QUIT => UiCommand::Quit,
        other => UiCommand::Unknown(other.to_string()),
    }
}
