use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authorization failed: {0}")]
    Auth(String),

    #[error("Rate limited, retry after {}s", retry_after.unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    #[error("Catalog returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bot API error {code}: {description}")]
    Api { code: i32, description: String },
}
