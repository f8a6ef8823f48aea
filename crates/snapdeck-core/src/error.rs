use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deck error: {0}")]
    Deck(String),

    #[error("Invalid fragment: {0}")]
    InvalidFragment(String),
}

pub type Result<T> = std::result::Result<T, Error>;
