//! Error types for site inputs and grid storage.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteIoError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("invalid origin '{0}': expected two or three numbers")]
    InvalidOrigin(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt grid '{key}': {reason}")]
    CorruptGrid { key: String, reason: String },
}

impl SiteIoError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptGrid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<quick_xml::Error> for SiteIoError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SiteIoError>;
