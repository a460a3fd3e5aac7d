/// A music track downloader.
///
/// Reads descriptor files listing tracks, skips the ones already present in
/// the output directory and hands the rest to an external youtube-dl
/// compatible tool, one track at a time and in input order.
///
/// # Architecture
///
/// - `Track`: track identity and its filesystem-safe canonical name
/// - `descriptor`: CSV descriptor parsing
/// - `scan`: existing-file detection
/// - `Downloader`: backend capability, with the `YoutubeDl` implementation
/// - `Runner`: orchestration of a whole run
///
/// # Example
/// ```no_run
/// use music_dl::{create_downloader, Config, Runner};
/// use std::path::PathBuf;
///
/// async fn example() {
///     let config = Config::default();
///     let downloader = create_downloader(&config).unwrap();
///     let files = vec![PathBuf::from("tracks.csv")];
///     Runner::new(&config, downloader.as_ref()).run(&files).await.unwrap();
/// }
/// ```
pub mod config;
pub mod descriptor;
pub mod downloader;
pub mod error;
pub mod progress;
pub mod runner;
pub mod scan;
pub mod track;

// Re-export commonly used items
pub use config::Config;
pub use downloader::{create_downloader, Downloader, YoutubeDl};
pub use error::{AppError, DownloadError, ParseError};
pub use progress::{RunProgress, Summary};
pub use runner::Runner;
pub use track::Track;
