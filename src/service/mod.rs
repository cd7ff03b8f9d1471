//! Card backend access.

mod http;
mod provider;
mod types;

pub use http::{HttpCardService, HttpCardServiceBuilder, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use provider::CardService;
pub use types::{BackgroundRequest, BackgroundResponse, CardRequest, CardResponse};
