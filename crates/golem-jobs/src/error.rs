use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions of the command list generator.
///
/// The first three variants are the ones the CLI reports with a plain
/// console message and exit status 255; anything else is carried through
/// `Other` and fails the process the ordinary way.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("rf_ace.config file is missing: {}", .0.display())]
    ConfigMissing(PathBuf),
    #[error("Associations output path does not exist and mkdir failed {}, exiting", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a valid file, exiting", .0.display())]
    MatrixMissing(PathBuf),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GenError {
    pub fn code(&self) -> &'static str {
        match self {
            GenError::ConfigMissing(_) => "config_missing",
            GenError::CreateDir { .. } => "create_dir_failed",
            GenError::MatrixMissing(_) => "matrix_missing",
            GenError::Other(_) => "command_failed",
        }
    }

    /// Exit status the CLI should terminate with.
    pub fn exit_status(&self) -> i32 {
        match self {
            GenError::Other(_) => 1,
            _ => 255,
        }
    }
}

impl From<std::io::Error> for GenError {
    fn from(err: std::io::Error) -> Self {
        GenError::Other(err.into())
    }
}
