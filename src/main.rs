use clap::Parser;
use music_dl::error::Result;
use music_dl::{create_downloader, Config, Runner};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Download the tracks listed in descriptor files that are not already
/// present in the output directory.
#[derive(Parser, Debug)]
#[command(name = "music-dl")]
#[command(version)]
#[command(about = "Download music tracks listed in CSV descriptor files")]
struct Cli {
    /// Descriptor files (CSV with title, artist, album, url columns)
    files: Vec<PathBuf>,

    /// Downloader backend name (ytdl, yt-dlp)
    #[arg(short = 'd', long = "downloader")]
    backend: Option<String>,

    /// Output audio format
    #[arg(short, long)]
    format: Option<String>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print information as tracks are found and downloaded
    #[arg(short, long)]
    print: bool,

    /// Number of downloads to run at once
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Path to the backend executable
    #[arg(short = 'x', long)]
    executable: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug information to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Defaults, then the config file, then explicit flags.
    fn into_config(self) -> Result<(Config, Vec<PathBuf>)> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if let Some(executable) = self.executable {
            config.executable = Some(executable);
        }
        config.print_info |= self.print;

        config.validate()?;
        Ok((config, self.files))
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main entry point for the application.
///
/// # Steps
/// 1. Parses the command line and initializes logging
/// 2. Builds the configuration and the downloader backend
/// 3. Runs the downloads
///
/// Any error is logged and turns into exit status 1.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run_application(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run_application(cli: Cli) -> Result<()> {
    let (config, files) = cli.into_config()?;
    let downloader = create_downloader(&config)?;

    let summary = Runner::new(&config, downloader.as_ref()).run(&files).await?;
    info!(
        downloaded = summary.downloaded,
        existing = summary.existing,
        "application completed successfully"
    );
    Ok(())
}
