use std::path::PathBuf;

use thiserror::Error;

/// Errors raised around the formatter: loading input and config, decoding
/// backend payloads, and rendering. Parsing itself never fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The backend answered, but without usable content
    #[error("backend error: {0}")]
    Backend(String),

    #[error("render failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
