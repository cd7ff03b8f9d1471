//! Image formats and references.

mod types;

pub use types::{to_data_url, ImageFormat, ImageReference};
