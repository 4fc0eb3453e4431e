pub const CMD_DOWNLOAD: &str = ":download";
pub const CMD_CLEAR: &str = ":clear";
pub const CMD_HELP: &str = ":help";
pub const CMD_QUIT: &str = ":quit";

pub const TITLE: &str = "Link to QR Code";
pub const PLACEHOLDER: &str = "Enter a link to generate a QR code";
pub const DOWNLOAD_LABEL: &str = "Download QR Code";
