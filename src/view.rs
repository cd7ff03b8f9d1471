//! The visible surface the card builder drives.

use crate::error::{CardError, ErrorKind, Result};
use std::fmt;

/// Default filename offered when saving the finished card.
pub const DEFAULT_CARD_FILENAME: &str = "christmas-card.png";

/// Severity of a user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Input was rejected locally.
    Validation,
    /// The backend reported a failure.
    Failure,
    /// The request itself failed.
    Error,
}

impl From<ErrorKind> for NoticeLevel {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation => Self::Validation,
            ErrorKind::Failure => Self::Failure,
            ErrorKind::Error => Self::Error,
        }
    }
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// Creates a notice.
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Builds the notice for an error raised while running `action`.
    ///
    /// Backend failures read "`<action>` failed: <reason>", transport
    /// errors "An error occurred: <error>", validation errors are shown as-is.
    pub fn for_error(action: &str, err: &CardError) -> Self {
        let level = NoticeLevel::from(err.kind());
        let message = match level {
            NoticeLevel::Validation => err.to_string(),
            NoticeLevel::Failure => format!("{action} failed: {err}"),
            NoticeLevel::Error => format!("An error occurred: {err}"),
        };
        Self { level, message }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// UI elements owned by the host (browser page, terminal, test double).
pub trait CardView {
    /// Shows or hides the busy indicator.
    fn set_busy(&mut self, busy: bool);

    /// Shows a notice to the user.
    fn notify(&mut self, notice: Notice);

    /// Renders the background reference into the preview area.
    fn show_preview(&mut self, reference: &str);

    /// Enables or disables the create-card action.
    fn set_create_enabled(&mut self, enabled: bool);

    /// Displays the finished card and reveals the result area.
    fn show_result(&mut self, reference: &str);

    /// Scrolls the result area into view.
    fn scroll_to_result(&mut self) {}

    /// Saves the card image under `filename`.
    fn save_card(&mut self, reference: &str, filename: &str) -> Result<()>;
}
