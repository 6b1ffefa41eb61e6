use clap::{ArgAction, Parser};
use eyre::{Result, bail};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{Level, info};
use tutormatch::assignments::assign_campaign;
use tutormatch::config::Config;
use tutormatch::loaders::Loader;
use tutormatch::{checks, display, export};

#[derive(Parser)]
#[command(version, about = "Automatically assign tutees to tutors")]
struct Args {
    /// Use FILE instead of tutormatch.toml
    #[arg(short, long, value_name = "FILE", default_value = "tutormatch.toml")]
    config: PathBuf,
    /// Campaign to process, overrides the configuration file
    #[arg(long)]
    campaign: Option<u64>,
    /// Write the new assignments to FILE as CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,
    /// Do not write back results to database
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Show the tutees given to every tutor
    #[arg(short, long)]
    details: bool,
    /// Set verbosity level
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = Config::load(&args.config)?;
    let Some(campaign_id) = args.campaign.or(config.campaign.id) else {
        bail!("no campaign given, use --campaign or set campaign.id in the configuration file");
    };
    let mut loader = Loader::new(&config.database.url).await?;
    let mut campaign = loader.load(campaign_id).await?;

    let start = Instant::now();
    let report = assign_campaign(&mut campaign);
    info!(elapsed = ?start.elapsed(), "assignments computed");
    checks::ensure_quotas(&campaign)?;

    if !args.dry_run {
        loader.save_assignments(&report.pairs).await?;
    }
    if let Some(path) = args.csv.or(config.output.csv) {
        export::write_csv_file(&campaign, &path)?;
    }

    display::display_trace(&report);
    println!();
    if args.details {
        display::display_details(&campaign);
    }
    display::display_stats(&campaign);
    display::display_open_places(&campaign);
    checks::warn_unassigned(&campaign);
    Ok(())
}
