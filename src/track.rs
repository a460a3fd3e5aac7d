use std::fmt;

/// Characters that are never allowed in a canonical name.
const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// One unit of audio to acquire.
///
/// Tracks are plain values: built once by the descriptor parser and only
/// read afterwards by the scanner and the downloader. The parser guarantees
/// a non-empty title and a non-empty, absolute `url`.
///
/// # Examples
///
/// ```
/// use music_dl::Track;
///
/// let track = Track::new("Song", Some("Band"), None, "http://u/1");
/// assert_eq!(track.to_string(), "Band - Song");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Track {
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub url: String,
}

impl Track {
    pub fn new(
        title: impl Into<String>,
        artist: Option<&str>,
        album: Option<&str>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.map(str::to_string),
            album: album.map(str::to_string),
            url: url.into(),
        }
    }

    /// Filesystem-safe name used for reporting and as the output file stem.
    ///
    /// `"Artist - Title"`, or just `"Title"` without an artist. Album is not
    /// part of the name.
    pub fn canonical_name(&self) -> String {
        let raw = match self.artist.as_deref() {
            Some(artist) if !artist.trim().is_empty() => {
                format!("{} - {}", artist.trim(), self.title.trim())
            }
            _ => self.title.trim().to_string(),
        };
        sanitize(&raw)
    }

    /// Name of the file the backend produces for this track.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.canonical_name(), extension)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

/// Turns arbitrary text into a single valid path component.
pub fn sanitize(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| {
            if RESERVED.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    // Windows drops trailing dots and spaces silently.
    let trimmed = replaced.trim().trim_end_matches(&['.', ' '][..]);

    if trimmed.chars().all(|c| c == '.') {
        return "_".to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_with_artist() {
        let track = Track::new("A", Some("X"), None, "http://u/1");
        assert_eq!(track.canonical_name(), "X - A");
        assert_eq!(track.to_string(), "X - A");
    }

    #[test]
    fn name_without_artist() {
        let track = Track::new("Alone", None, None, "http://u/1");
        assert_eq!(track.canonical_name(), "Alone");
    }

    #[test]
    fn blank_artist_is_ignored() {
        let track = Track::new("Alone", Some("  "), None, "http://u/1");
        assert_eq!(track.canonical_name(), "Alone");
    }

    #[test]
    fn album_does_not_change_name() {
        let a = Track::new("A", Some("X"), None, "http://u/1");
        let b = Track::new("A", Some("X"), Some("LP"), "http://u/1");
        assert_eq!(a.canonical_name(), b.canonical_name());
    }

    #[test]
    fn separators_are_replaced() {
        let track = Track::new("AC/DC: Live?", Some("a\\b"), None, "http://u/1");
        assert_eq!(track.canonical_name(), "a_b - AC_DC_ Live_");
    }

    #[test]
    fn unicode_is_kept() {
        let track = Track::new("Ода к радости", Some("Бетховен"), None, "http://u/1");
        assert_eq!(track.canonical_name(), "Бетховен - Ода к радости");
    }

    #[test]
    fn dot_names_are_not_path_components() {
        assert_eq!(sanitize("."), "_");
        assert_eq!(sanitize(".."), "_");
        assert_eq!(sanitize("name."), "name");
        assert_eq!(sanitize(""), "_");
    }

    #[test]
    fn file_name_appends_extension() {
        let track = Track::new("A", Some("X"), None, "http://u/1");
        assert_eq!(track.file_name("mp3"), "X - A.mp3");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn canonical_name_is_single_component(title in "\\PC*", artist in proptest::option::of("\\PC*")) {
                let track = Track::new(title, artist.as_deref(), None, "http://u/1");
                let name = track.canonical_name();
                prop_assert!(!name.is_empty());
                prop_assert!(!name.contains(RESERVED));
                prop_assert!(!name.chars().any(char::is_control));
                prop_assert!(name != "." && name != "..");
            }

            #[test]
            fn canonical_name_is_deterministic(title in ".*", artist in ".*") {
                let a = Track::new(title.clone(), Some(&artist), None, "http://u/1");
                let b = Track::new(title, Some(&artist), None, "http://u/2");
                prop_assert_eq!(a.canonical_name(), b.canonical_name());
            }
        }
    }
}
