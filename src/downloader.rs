use crate::config::Config;
use crate::error::{AppError, DownloadError, Result};
use crate::track::Track;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Anything able to turn a [`Track`] into an audio file.
///
/// Implementations report failure and nothing more: retrying or skipping is
/// the caller's decision.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Extension of the files this downloader produces, without the dot.
    fn extension(&self) -> &str;

    /// Produces `<dir>/<canonical name>.<extension>` for `track`.
    async fn download(&self, track: &Track, dir: &Path) -> std::result::Result<(), DownloadError>;
}

/// Builds the downloader selected by `config.backend`.
///
/// # Errors
/// * Unknown backend name
/// * Audio format the backend cannot produce
pub fn create_downloader(config: &Config) -> Result<Box<dyn Downloader>> {
    let default_executable = match config.backend.as_str() {
        "ytdl" | "youtube-dl" => "youtube-dl",
        "yt-dlp" => "yt-dlp",
        other => return Err(AppError::Config(format!("unknown downloader {other:?}"))),
    };
    let executable = config
        .executable
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_executable));

    Ok(Box::new(YoutubeDl::new(executable, &config.format)?))
}

/// Backend driving any youtube-dl compatible command line tool.
///
/// Each download runs
/// `<executable> -x --audio-format <format> -o "<name>.%(ext)s" -- <url>`
/// with the destination as working directory.
#[derive(Debug, Clone)]
pub struct YoutubeDl {
    executable: PathBuf,
    format: String,
    extension: String,
}

impl YoutubeDl {
    /// # Errors
    /// Fails when `format` has no known output extension.
    pub fn new(executable: impl Into<PathBuf>, format: &str) -> Result<Self> {
        let mut format = format.trim().to_ascii_lowercase();
        // The tools only know the codec name.
        if format == "ogg" {
            format = String::from("vorbis");
        }
        let extension = format_extension(&format)
            .ok_or_else(|| AppError::Config(format!("unsupported audio format {format:?}")))?;

        Ok(Self {
            executable: executable.into(),
            extension: extension.to_string(),
            format,
        })
    }

    /// Arguments passed to the executable for `track`.
    pub fn args(&self, track: &Track) -> Vec<String> {
        vec![
            "-x".to_string(),
            "--audio-format".to_string(),
            self.format.clone(),
            "-o".to_string(),
            output_template(track),
            "--".to_string(),
            track.url.clone(),
        ]
    }
}

#[async_trait]
impl Downloader for YoutubeDl {
    fn extension(&self) -> &str {
        &self.extension
    }

    #[instrument(skip(self, track), fields(track = %track))]
    async fn download(&self, track: &Track, dir: &Path) -> std::result::Result<(), DownloadError> {
        let executable = self.executable.display().to_string();
        debug!(%executable, url = %track.url, "invoking backend");

        let output = Command::new(&self.executable)
            .args(self.args(track))
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| DownloadError::Launch {
                executable: executable.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .map(str::to_string);

        Err(DownloadError::Exit {
            executable,
            status: output.status,
            detail,
        })
    }
}

/// Output file template: the canonical name with `%` escaped, followed by
/// the backend's own extension placeholder.
fn output_template(track: &Track) -> String {
    format!("{}.%(ext)s", track.canonical_name().replace('%', "%%"))
}

/// File extension produced for an `--audio-format` value.
fn format_extension(format: &str) -> Option<&'static str> {
    match format {
        "mp3" => Some("mp3"),
        "flac" => Some("flac"),
        "wav" => Some("wav"),
        "opus" => Some("opus"),
        "m4a" | "aac" | "alac" => Some("m4a"),
        "vorbis" => Some("ogg"),
        _ => None,
    }
}
