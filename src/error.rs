/// Errors raised while dispatching a prompt to the generative-language service
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Malformed service response: {details}")]
    MalformedResponse { details: String },

    #[error("Prompt was blocked by the service: {reason}")]
    Blocked { reason: String },

    #[error("Service returned no text")]
    EmptyResponse,
}

/// Errors that can occur while loading or saving the settings file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("Invalid value for `{key}`: expected {expected}")]
    InvalidValue { key: String, expected: &'static str },
}

/// Errors reported when checking a scraper result document
#[derive(Debug, thiserror::Error)]
pub enum ScrapeCheckError {
    #[error("Scrape result is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Scraper reported failure: {0}")]
    Failed(String),
}

/// Errors from the allowed-email check
#[derive(Debug, thiserror::Error)]
pub enum AllowListError {
    #[error("Email address is required")]
    MissingEmail,
}
