use cf_clics_feed::fetch::{ApiCall, Credentials, Fetcher};
use cf_clics_feed::{output, ContestInput, Error, FeedConfig, Format, OutputError, Synthesizer};
use chrono::Utc;
use clap::Parser;
use log::{error, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;

/// Convert Codeforces contest results into a CLICS event feed.
#[derive(Parser)]
#[command(name = "cf-clics-feed", version)]
struct Cli {
    /// Submission list (`contest.status`); fetched when absent
    status: PathBuf,

    /// Standings (`contest.standings`); fetched when absent
    standings: PathBuf,

    /// Where to write the feed
    output: PathBuf,

    /// Feed configuration
    #[arg(short, long, default_value = "feed-config.json")]
    config: PathBuf,

    /// Output encoding: `ndjson` or `xml`
    #[arg(short, long, default_value = "xml")]
    format: Format,

    /// Fail instead of fetching missing input documents
    #[arg(long)]
    no_fetch: bool,
}

fn fetch_missing(cli: &Cli, config: &FeedConfig) -> Result<(), Error> {
    let missing: Vec<(ApiCall, &Path)> = vec![
        (ApiCall::submission_list(config.contest_id), cli.status.as_path()),
        (ApiCall::standings(config.contest_id), cli.standings.as_path()),
    ]
    .into_iter()
    .filter(|(_, path)| !path.is_file())
    .collect();
    if missing.is_empty() || cli.no_fetch {
        return Ok(());
    }

    let credentials = Credentials::from_env();
    if credentials.is_none() {
        info!("CF_API_KEY/CF_API_SECRET not set, sending unsigned requests");
    }
    let fetcher = Fetcher::new(credentials)?;
    for (call, path) in &missing {
        fetcher.fetch_to_file(call, path)?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = FeedConfig::load(&cli.config)?;
    fetch_missing(&cli, &config)?;

    let input = ContestInput::load(&cli.status, &cli.standings)?;
    let feed = Synthesizer::new(&config).synthesize(&input, Utc::now())?;

    let file = File::create(&cli.output).map_err(OutputError::Io)?;
    output::write_events(cli.format, &feed.events, BufWriter::new(file))?;
    info!(
        "Contest {} feed generated! Wrote {} events to {:?}",
        config.contest_id,
        feed.events.len(),
        cli.output
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        error!("{}", e);
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}
