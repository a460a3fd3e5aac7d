//! Descriptor file parsing.
//!
//! A descriptor is a UTF-8 CSV document with a header row. The columns
//! `title`, `artist`, `album` and `url` are recognised in any order and
//! case; other columns are ignored. Lines starting with `#` before the
//! header are comments. After the header every non-blank line is a record,
//! so a title such as `#9 Dream` needs no quoting.
//!
//! ```text
//! # my playlist
//! title,artist,album,url
//! Paranoid Android,Radiohead,OK Computer,https://example.com/watch?v=1
//! #9 Dream,John Lennon,,https://example.com/watch?v=2
//! "Hello, World",,,https://example.com/watch?v=3
//! ```

use crate::error::ParseError;
use crate::track::Track;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use url::Url;

/// One raw CSV record before validation.
#[derive(Debug, Deserialize)]
struct Record {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    album: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Parses descriptor content into tracks, in file order.
///
/// Content is taken as raw bytes; invalid UTF-8 is reported like any other
/// malformed record. Fails on the first record that cannot become a
/// well-formed track; no tracks are returned in that case.
///
/// # Examples
///
/// ```
/// use music_dl::descriptor::parse;
///
/// let tracks = parse("title,artist,url\nA,X,http://u/1\n").unwrap();
/// assert_eq!(tracks[0].to_string(), "X - A");
/// ```
pub fn parse(content: impl AsRef<[u8]>) -> Result<Vec<Track>, ParseError> {
    let (skipped, body) = skip_preamble(content.as_ref());
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(body);

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| csv_error(&e, skipped))?
        .iter()
        .map(str::to_ascii_lowercase)
        .collect();

    let mut tracks = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(&e, skipped))?;
        let line = record.position().map_or(0, |p| p.line() + skipped);
        let raw: Record = record
            .deserialize(Some(&headers))
            .map_err(|e| ParseError::new(line, e.to_string()))?;
        tracks.push(into_track(raw, line)?);
    }

    Ok(tracks)
}

/// Splits off the blank and `#` lines preceding the header, returning how
/// many lines were dropped.
fn skip_preamble(content: &[u8]) -> (u64, &[u8]) {
    let mut skipped = 0;
    let mut rest = content;
    while !rest.is_empty() {
        let end = rest
            .iter()
            .position(|&b| b == b'\n')
            .map_or(rest.len(), |i| i + 1);
        match rest[..end].iter().copied().find(|b| !b.is_ascii_whitespace()) {
            None | Some(b'#') => {
                skipped += 1;
                rest = &rest[end..];
            }
            Some(_) => break,
        }
    }
    (skipped, rest)
}

fn into_track(raw: Record, line: u64) -> Result<Track, ParseError> {
    let url = non_empty(raw.url).ok_or_else(|| ParseError::new(line, "missing url"))?;
    Url::parse(&url).map_err(|e| ParseError::new(line, format!("invalid url {url:?}: {e}")))?;

    let title = non_empty(raw.title).ok_or_else(|| ParseError::new(line, "missing title"))?;

    Ok(Track {
        title,
        artist: non_empty(raw.artist),
        album: non_empty(raw.album),
        url,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn csv_error(error: &csv::Error, skipped: u64) -> ParseError {
    let line = error.position().map_or(0, |p| p.line() + skipped);
    ParseError::new(line, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_records_in_order() {
        let content = "title,artist,url\nA,X,http://u/1\nB,Y,http://u/2\n";
        let tracks = parse(content).unwrap();
        assert_eq!(
            tracks,
            vec![
                Track::new("A", Some("X"), None, "http://u/1"),
                Track::new("B", Some("Y"), None, "http://u/2"),
            ]
        );
    }

    #[test]
    fn headers_are_case_insensitive_and_reorderable() {
        let content = "URL, Album ,Title\nhttp://u/1,LP,A\n";
        let tracks = parse(content).unwrap();
        assert_eq!(tracks, vec![Track::new("A", None, Some("LP"), "http://u/1")]);
    }

    #[test]
    fn empty_optional_fields_are_absent() {
        let tracks = parse("title,artist,album,url\nA,,,http://u/1\n").unwrap();
        assert_eq!(tracks[0].artist, None);
        assert_eq!(tracks[0].album, None);
    }

    #[test]
    fn quoted_fields_and_leading_comments() {
        let content = "# playlist\n\ntitle,artist,url\n\"Hello, World\",X,http://u/1\n\n";
        let tracks = parse(content).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "Hello, World");
    }

    #[test]
    fn hash_titles_after_header_are_records() {
        let content = "title,artist,url\n#1 Crush,Garbage,http://u/1\n#9 Dream,John Lennon,http://u/2\n";
        let tracks = parse(content).unwrap();
        let titles: Vec<_> = tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["#1 Crush", "#9 Dream"]);
    }

    #[test]
    fn line_numbers_count_leading_comments() {
        let err = parse("# a\n# b\ntitle,url\nA,http://u/1\nB,\n").unwrap_err();
        assert_eq!(err.line, 5);
    }

    #[test]
    fn invalid_utf8_fails_with_line() {
        let err = parse(&b"title,url\nA,http://u/1\n\xff\xfe,http://u/2\n"[..]).unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let tracks = parse("title,url,rating\nA,http://u/1,5\n").unwrap();
        assert_eq!(tracks, vec![Track::new("A", None, None, "http://u/1")]);
    }

    #[test]
    fn empty_content_has_no_tracks() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("title,url\n").unwrap().is_empty());
    }

    #[test]
    fn empty_url_fails() {
        let err = parse("title,artist,url\nA,X,http://u/1\nB,Y,\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.reason, "missing url");
    }

    #[test]
    fn missing_url_column_fails() {
        let err = parse("title,artist\nA,X\n").unwrap_err();
        assert_eq!(err.reason, "missing url");
    }

    #[test]
    fn missing_title_fails() {
        let err = parse("title,url\n,http://u/1\n").unwrap_err();
        assert_eq!(err.reason, "missing title");
    }

    #[test]
    fn invalid_url_fails() {
        let err = parse("title,url\nA,not a url\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.reason.starts_with("invalid url"));
    }

    #[test]
    fn wrong_field_count_fails() {
        assert!(parse("title,url\nA,http://u/1,extra\n").is_err());
    }

    #[test]
    fn parsing_is_deterministic() {
        let content = "title,artist,url\nA,X,http://u/1\nB,Y,http://u/2\n";
        assert_eq!(parse(content).unwrap(), parse(content).unwrap());
    }
}
