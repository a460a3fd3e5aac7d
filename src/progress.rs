use crate::track::Track;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing::debug;

/// Progress tracking and reporting for a download run.
///
/// Notices go to the configured writer only when printing is enabled; they
/// are always mirrored as debug-level tracing events.

/// Final numbers of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub existing: usize,
    pub downloaded: usize,
    pub elapsed: Duration,
}

/// Tracks and reports per-track progress.
///
/// # Examples
///
/// ```
/// use music_dl::{RunProgress, Track};
///
/// let mut progress = RunProgress::new(false, 1);
/// let track = Track::new("A", Some("X"), None, "http://u/1");
/// progress.started(&track);
/// progress.completed(&track);
/// assert_eq!(progress.summary().downloaded, 1);
/// ```
pub struct RunProgress {
    print_info: bool,
    out: Box<dyn Write + Send>,
    pub total: usize,
    pub existing: usize,
    pub downloaded: usize,
    pub start_time: Instant,
}

impl RunProgress {
    pub fn new(print_info: bool, total: usize) -> Self {
        Self::with_writer(print_info, total, Box::new(io::stdout()))
    }

    pub fn with_writer(print_info: bool, total: usize, out: Box<dyn Write + Send>) -> Self {
        Self {
            print_info,
            out,
            total,
            existing: 0,
            downloaded: 0,
            start_time: Instant::now(),
        }
    }

    pub fn found(&mut self, track: &Track) {
        self.existing += 1;
        debug!(track = %track, "already present");
        self.notice("found", track);
    }

    pub fn started(&mut self, track: &Track) {
        debug!(track = %track, "download started");
        self.notice("started", track);
    }

    pub fn completed(&mut self, track: &Track) {
        self.downloaded += 1;
        debug!(track = %track, "download completed");
        self.notice("completed", track);
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total: self.total,
            existing: self.existing,
            downloaded: self.downloaded,
            elapsed: self.start_time.elapsed(),
        }
    }

    /// Prints the closing line of a run.
    pub fn finish(&mut self) -> Summary {
        let summary = self.summary();
        if self.print_info {
            let _ = writeln!(
                self.out,
                "done: {} downloaded, {} already present, {} total in {:.1}s",
                summary.downloaded,
                summary.existing,
                summary.total,
                summary.elapsed.as_secs_f64()
            );
        }
        summary
    }

    fn notice(&mut self, label: &str, track: &Track) {
        if self.print_info {
            // A closed stdout must not abort the run.
            let _ = writeln!(self.out, "{label}: {track}");
        }
    }
}
