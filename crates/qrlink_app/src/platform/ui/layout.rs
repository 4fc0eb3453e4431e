use super::constants::*;

pub fn banner() -> Vec<String> {
    let mut lines = vec![
        TITLE.to_string(),
        "Generate QR codes for your links instantly.".to_string(),
        String::new(),
    ];
    lines.extend(help());
    lines
}

pub fn help() -> Vec<String> {
    vec![
        "Type a link and press Enter; the code refreshes after a short pause.".to_string(),
        format!("  {CMD_DOWNLOAD:<10} save the current code as PNG"),
        format!("  {CMD_CLEAR:<10} clear the input"),
        format!("  {CMD_HELP:<10} show this help"),
        format!("  {CMD_QUIT:<10} exit"),
        "Start a line with :: to enter text that begins with a colon.".to_string(),
    ]
}
