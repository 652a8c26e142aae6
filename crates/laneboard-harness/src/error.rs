use std::path::PathBuf;

use laneboard_core::{BoardError, ConfigError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INVALID_INPUT: i32 = 2;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scenario JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("board error: {0}")]
    Board(#[from] BoardError),

    #[error("could not render config: {0}")]
    Render(String),

    #[error("scenario step {index}: {message}")]
    Step { index: usize, message: String },
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Json(_) | Self::Config(_) | Self::Board(_) | Self::Step { .. } => {
                EXIT_INVALID_INPUT
            }
            Self::Io { .. } | Self::Render(_) => EXIT_FAILURE,
        }
    }

    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_exit_two() {
        let error = HarnessError::Step {
            index: 3,
            message: "unknown touch".to_string(),
        };
        assert_eq!(error.exit_code(), EXIT_INVALID_INPUT);
        assert_eq!(error.to_string(), "scenario step 3: unknown touch");
    }

    #[test]
    fn io_errors_name_the_path() {
        let error = HarnessError::io(
            "missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(error.exit_code(), EXIT_FAILURE);
        assert!(error.to_string().contains("missing.json"));
    }
}
