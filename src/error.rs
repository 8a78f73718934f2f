use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Asked for the expected type of a name that has no canonical entry.
    #[error("`{0}` is not the name of a canonical attribute")]
    UnknownCanonicalName(String),

    #[error("could not open file {path:?}")]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not get image spec for {path:?}: {reason}")]
    NoSpec { path: PathBuf, reason: String },

    #[error("catalog store error: {0}")]
    Store(#[from] rusqlite::Error),
}
