//! Terminal front-end: a [`CardView`] that renders to stderr and saves to disk.

use crate::error::Result;
use crate::image::ImageReference;
use crate::view::{CardView, Notice, NoticeLevel};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A [`CardView`] for shells.
///
/// Progress and notices go to stderr so stdout stays free for `--json` output.
#[derive(Debug)]
pub struct TerminalView {
    out_dir: PathBuf,
    quiet: bool,
    busy_since: Option<Instant>,
    create_enabled: bool,
    preview: Option<String>,
    result: Option<String>,
    notices: Vec<Notice>,
    saved: Vec<PathBuf>,
}

impl TerminalView {
    /// Creates a view that saves cards into `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            quiet: false,
            busy_since: None,
            create_enabled: false,
            preview: None,
            result: None,
            notices: Vec::new(),
            saved: Vec::new(),
        }
    }

    /// Suppresses progress lines (notices are still printed).
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Directory cards are saved into.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy_since.is_some()
    }

    /// Whether the create-card action is available.
    pub fn create_enabled(&self) -> bool {
        self.create_enabled
    }

    /// Reference currently in the preview area.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Reference currently in the result area.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Notices shown so far.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Files written so far.
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }

    fn progress(&self, line: &str) {
        if !self.quiet {
            eprintln!("{line}");
        }
    }
}

impl CardView for TerminalView {
    fn set_busy(&mut self, busy: bool) {
        match (busy, self.busy_since.take()) {
            (true, _) => {
                self.progress("⏳ working...");
                self.busy_since = Some(Instant::now());
            }
            (false, Some(started)) => {
                self.progress(&format!("   done in {}ms", started.elapsed().as_millis()));
            }
            (false, None) => {}
        }
    }

    fn notify(&mut self, notice: Notice) {
        let marker = match notice.level {
            NoticeLevel::Validation => "!",
            NoticeLevel::Failure | NoticeLevel::Error => "✗",
        };
        eprintln!("{marker} {notice}");
        self.notices.push(notice);
    }

    fn show_preview(&mut self, reference: &str) {
        let shown = ImageReference::parse(reference)
            .map(|r| r.describe())
            .unwrap_or_else(|_| reference.to_string());
        self.progress(&format!("🎨 background: {shown}"));
        self.preview = Some(reference.to_string());
    }

    fn set_create_enabled(&mut self, enabled: bool) {
        self.create_enabled = enabled;
    }

    fn show_result(&mut self, reference: &str) {
        let shown = ImageReference::parse(reference)
            .map(|r| r.describe())
            .unwrap_or_else(|_| reference.to_string());
        self.progress(&format!("🎄 card: {shown}"));
        self.result = Some(reference.to_string());
    }

    fn save_card(&mut self, reference: &str, filename: &str) -> Result<()> {
        let image = ImageReference::parse(reference)?;
        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(filename);
        image.save(&path)?;
        tracing::info!(path = %path.display(), "card saved");
        self.progress(&format!("💾 saved {}", path.display()));
        self.saved.push(path);
        Ok(())
    }
}

/// One line of input in an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// `bg <prompt>`: generate a background.
    Background(String),
    /// `card <message>`: composite the card.
    Card(String),
    /// `save`: save the finished card.
    Save,
    /// `status`: show the session state.
    Status,
    /// `help`: list commands.
    Help,
    /// `quit` / `exit`: end the session.
    Quit,
    /// Blank line.
    Empty,
    /// Anything else.
    Unknown(String),
}

impl SessionCommand {
    /// Parses a session input line.
    ///
    /// A bare `bg` parses to an empty prompt; the controller turns that into
    /// the usual validation notice.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match word.to_lowercase().as_str() {
            "bg" | "background" => Self::Background(rest.to_string()),
            "card" => Self::Card(rest.to_string()),
            "save" | "download" => Self::Save,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(word.to_string()),
        }
    }

    /// Help text listing the commands.
    pub const HELP: &'static str = "commands:
  bg <prompt>      generate a card background
  card <message>   write the message onto the background
  save             save the finished card
  status           show the current session
  quit             leave";
}
