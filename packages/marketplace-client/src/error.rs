use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketplaceError>;

#[derive(Debug, Error)]
pub enum MarketplaceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Marketplace API error (status {status}): {message}")]
    Api { status: u16, message: String },
}
