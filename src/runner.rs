use crate::config::Config;
use crate::descriptor;
use crate::downloader::Downloader;
use crate::error::{AppError, Result};
use crate::progress::{RunProgress, Summary};
use crate::scan::{remove_existing, scan_existing};
use crate::track::Track;
use futures::stream::{self, StreamExt};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, instrument};

/// Drives one run: descriptor files in, missing tracks downloaded.
///
/// Every error ends the run and is returned to the caller; the runner never
/// exits the process itself.
pub struct Runner<'a> {
    config: &'a Config,
    downloader: &'a dyn Downloader,
    out: Box<dyn Write + Send>,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a Config, downloader: &'a dyn Downloader) -> Self {
        Self {
            config,
            downloader,
            out: Box::new(io::stdout()),
        }
    }

    /// Sends progress notices somewhere other than stdout.
    pub fn with_output(mut self, out: Box<dyn Write + Send>) -> Self {
        self.out = out;
        self
    }

    /// Processes `files` in order.
    ///
    /// # Processing Flow
    /// 1. Creates the output directory
    /// 2. Parses every descriptor file, merging tracks in input order
    /// 3. Reports tracks whose file is already present
    /// 4. Downloads the rest in input order, at most `jobs` at a time
    ///
    /// # Errors
    /// * [`AppError::Input`] when `files` is empty
    /// * [`AppError::Directory`] when the output directory cannot be created
    /// * [`AppError::Read`] / [`AppError::Parse`] for a bad descriptor file
    /// * [`AppError::Download`] for the first track, in input order, whose
    ///   download fails; later tracks are not attempted
    #[instrument(skip_all, fields(files = files.len(), jobs = self.config.jobs))]
    pub async fn run(self, files: &[PathBuf]) -> Result<Summary> {
        if files.is_empty() {
            return Err(AppError::Input);
        }

        let dir = &self.config.output_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| AppError::Directory {
                path: dir.clone(),
                source,
            })?;

        let tracks = parse_files(files).await?;
        let existing = scan_existing(&tracks, dir, self.downloader.extension());

        let mut progress = RunProgress::with_writer(self.config.print_info, tracks.len(), self.out);
        for track in tracks.iter().filter(|track| existing.contains(*track)) {
            progress.found(track);
        }

        let pending = remove_existing(tracks, &existing);
        info!(
            existing = existing.len(),
            pending = pending.len(),
            "starting downloads"
        );

        let progress = Mutex::new(progress);
        let downloader = self.downloader;
        let mut downloads = stream::iter(pending.iter())
            .map(|track| {
                let progress = &progress;
                async move {
                    progress.lock().await.started(track);
                    downloader
                        .download(track, dir)
                        .await
                        .map(|()| track)
                        .map_err(|source| AppError::Download {
                            track: track.to_string(),
                            source,
                        })
                }
            })
            .buffered(self.config.jobs.max(1));

        while let Some(result) = downloads.next().await {
            let track = result?;
            progress.lock().await.completed(track);
        }
        drop(downloads);

        let summary = progress.into_inner().finish();
        info!(
            downloaded = summary.downloaded,
            elapsed = ?summary.elapsed,
            "run complete"
        );
        Ok(summary)
    }
}

/// Parses descriptor files one after another, keeping their order.
pub async fn parse_files(files: &[PathBuf]) -> Result<Vec<Track>> {
    let mut result = Vec::new();
    for path in files {
        result.extend(parse_file(path).await?);
    }
    Ok(result)
}

async fn parse_file(path: &Path) -> Result<Vec<Track>> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let tracks = descriptor::parse(&content).map_err(|source| AppError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), tracks = tracks.len(), "parsed descriptor");
    Ok(tracks)
}
