//! Polish text through Google's Gemini API, falling back to the original
//! text whenever the service can't be used.

pub mod allowlist;
pub mod config;
pub mod error;
pub mod formatter;
pub mod gemini;
pub mod scrape_check;

pub use allowlist::AllowList;
pub use config::{Credential, Settings};
pub use error::{AllowListError, ConfigError, DispatchError, ScrapeCheckError};
pub use formatter::{Backend, FormatOutcome, FormatRequest, TextFormatter};
pub use gemini::{GeminiClient, GenerativeModel};
