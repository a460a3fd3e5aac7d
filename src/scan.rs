use crate::track::Track;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Finds the tracks whose output file is already present in `dir`.
///
/// A track counts as existing when `dir/<canonical name>.<extension>` is a
/// regular file. A missing output directory simply holds nothing yet. The
/// filesystem is only inspected, never modified.
pub fn scan_existing(tracks: &[Track], dir: &Path, extension: &str) -> HashSet<Track> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "output directory absent, nothing exists yet");
        return HashSet::new();
    }

    tracks
        .iter()
        .filter(|track| dir.join(track.file_name(extension)).is_file())
        .cloned()
        .collect()
}

/// Drops every existing track, keeping the relative order of the rest.
pub fn remove_existing(tracks: Vec<Track>, existing: &HashSet<Track>) -> Vec<Track> {
    tracks
        .into_iter()
        .filter(|track| !existing.contains(track))
        .collect()
}
