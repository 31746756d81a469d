use std::{io, path::PathBuf};

use reqwest::StatusCode;

/// Broad failure category, used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Format,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("unable to decompress response from {url}: {source}")]
    Decompress {
        url: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed channel catalog: {source}")]
    Catalog {
        #[from]
        source: serde_json::Error,
    },

    #[error("unable to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("run cancelled")]
    Cancelled,
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } | Self::HttpStatus { .. } | Self::Cancelled => ErrorKind::Network,
            Self::Decompress { .. } | Self::Catalog { .. } => ErrorKind::Format,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
