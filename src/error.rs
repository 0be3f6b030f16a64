use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to access {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read answer from terminal")]
    Prompt(#[source] std::io::Error),

    #[error("Failed to build HTTP client")]
    HttpClient(#[from] reqwest::Error),

    #[error("Database was not ready after {attempts} polls")]
    PollLimitReached { attempts: u32 },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_leaves_cause_to_source_chain() {
        let err = Error::io(
            "/tmp/.env",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        );

        assert_eq!(err.to_string(), "Failed to access \"/tmp/.env\"");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("permission denied"));

        let err = Error::Prompt(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        assert!(!err.to_string().contains("closed"));
    }
}
