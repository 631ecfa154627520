use std::path::PathBuf;

use err_derive::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(display = "I/O Error on {:?}: {}", path, source)]
    IoError {
        path: PathBuf,
        #[error(source)]
        source: std::io::Error,
    },

    #[error(display = "Json Error: {}", _0)]
    JsonError(serde_json::Error),

    #[error(display = "Invalid config: {}", _0)]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::IoError { path: path.into(), source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err)
    }
}
