use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Error types for the application.
///
/// Every failure is fatal to a run. Components return these values up the
/// call chain and only the binary decides to terminate the process.

/// Represents all possible errors that can occur during a run.
///
/// # Error Categories
///
/// - Input: no descriptor files were given
/// - Read / Parse: descriptor files could not be read or parsed
/// - Directory: the output directory could not be created
/// - Download: the external backend failed for a track
/// - Config: invalid backend, format or configuration file
#[derive(Error, Debug)]
pub enum AppError {
    #[error("no input files provided")]
    Input,

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to make output directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to download {track}: {source}")]
    Download {
        track: String,
        #[source]
        source: DownloadError,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for AppError {
    fn from(error: toml::de::Error) -> Self {
        AppError::Config(error.to_string())
    }
}

/// A descriptor record that could not be turned into a track.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct ParseError {
    /// 1-based line of the offending record, 0 when unknown.
    pub line: u64,
    pub reason: String,
}

impl ParseError {
    pub fn new(line: u64, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

/// Failure of a single backend invocation.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("could not launch {executable}: {source}")]
    Launch {
        executable: String,
        #[source]
        source: io::Error,
    },

    #[error("{executable} exited with {status}{}", detail_suffix(.detail))]
    Exit {
        executable: String,
        status: ExitStatus,
        /// Last non-empty line the backend wrote to stderr.
        detail: Option<String>,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_file_and_line() {
        let err = AppError::Parse {
            path: PathBuf::from("tracks.csv"),
            source: ParseError::new(3, "missing url"),
        };
        assert_eq!(err.to_string(), "failed to parse tracks.csv: line 3: missing url");
    }

    #[cfg(unix)]
    #[test]
    fn exit_error_includes_backend_detail() {
        use std::os::unix::process::ExitStatusExt;

        let err = DownloadError::Exit {
            executable: "yt-dlp".into(),
            status: ExitStatus::from_raw(1 << 8),
            detail: Some("ERROR: video unavailable".into()),
        };
        assert_eq!(
            err.to_string(),
            "yt-dlp exited with exit status: 1 (ERROR: video unavailable)"
        );
    }
}
