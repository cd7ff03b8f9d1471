#![warn(missing_docs)]
//! cardgen - greeting-card builder client.
//!
//! Collects a background description and a message, asks the card backend
//! to generate a background image and to composite the message onto it,
//! and saves the finished card.
//!
//! # Quick Start
//!
//! ```no_run
//! use cardgen::{CardBuilder, HttpCardService, TerminalView};
//!
//! #[tokio::main]
//! async fn main() -> cardgen::Result<()> {
//!     let service = HttpCardService::builder()
//!         .base_url("http://localhost:8080")
//!         .build()?;
//!     let mut builder = CardBuilder::new(service, TerminalView::new("."));
//!
//!     builder.request_background("a snowy pine forest at dusk").await?;
//!     builder.request_card_assembly("Happy Holidays!").await?;
//!     builder.download_card()?;
//!     Ok(())
//! }
//! ```
//!
//! # Seams
//!
//! - [`CardService`]: reaches the backend. [`HttpCardService`] speaks its
//!   JSON API over HTTP.
//! - [`CardView`]: the visible surface (busy indicator, preview, result,
//!   notices, saving). [`TerminalView`] renders to a terminal.
//!
//! # Features
//!
//! - `cli` (default): the terminal view and the `cardgen` binary.

mod controller;
mod error;
pub mod image;
pub mod service;
#[cfg(feature = "cli")]
pub mod terminal;
pub mod view;

// Re-export error types at crate root
pub use error::{CardError, ErrorKind, Result, ValidationError};

pub use controller::CardBuilder;
pub use image::{ImageFormat, ImageReference};
pub use service::{BackgroundResponse, CardResponse, CardService, HttpCardService};
pub use view::{CardView, Notice, NoticeLevel, DEFAULT_CARD_FILENAME};

#[cfg(feature = "cli")]
pub use terminal::{SessionCommand, TerminalView};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::controller::CardBuilder;
    pub use crate::error::{CardError, Result};
    pub use crate::service::{CardService, HttpCardService};
    pub use crate::view::{CardView, Notice};

    #[cfg(feature = "cli")]
    pub use crate::terminal::TerminalView;
}
