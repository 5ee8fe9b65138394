use std::path::PathBuf;
use std::process;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use mars_colony_data::calendar::{parse_date, DateRange};
use mars_colony_data::config::{GeneratorConfig, OutputPaths};
use mars_colony_data::dataset::generate_dataset;
use mars_colony_data::error::Result;
use mars_colony_data::export::write_dataset;
use mars_colony_data::notebook::{starter_notebook, write_notebook};
use mars_colony_data::verify::verify_dataset;

#[derive(Parser, Debug)]
#[command(name = "mars_colony_data")]
#[command(about = "Generate synthetic Mars colony consumption, weather and galactic event tables")]
struct Args {
    /// Random seed (default: 42)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cover one whole calendar year instead of --start/--end
    #[arg(short, long, conflicts_with_all = ["start", "end"])]
    year: Option<i32>,

    /// First day of data, YYYY-MM-DD (default: 2045-01-01)
    #[arg(long)]
    start: Option<String>,

    /// Last day of data, YYYY-MM-DD (default: 2045-12-31)
    #[arg(long)]
    end: Option<String>,

    /// Number of galactic events (default: 20)
    #[arg(short = 'e', long, allow_negative_numbers = true)]
    events: Option<i64>,

    /// Directory for the CSV tables (default: data)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Load settings from a JSON file; other flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the starter notebook
    #[arg(long)]
    notebook: Option<PathBuf>,

    /// Do not write the starter notebook
    #[arg(long)]
    skip_notebook: bool,

    /// Check the generated tables before writing and fail on any issue
    #[arg(long)]
    verify: bool,
}

fn build_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match args.config {
        Some(ref path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(year) = args.year {
        let range = DateRange::year(year)?;
        config.start_date = range.start();
        config.end_date = range.end();
    }
    if let Some(ref start) = args.start {
        config.start_date = parse_date(start)?;
    }
    if let Some(ref end) = args.end {
        config.end_date = parse_date(end)?;
    }
    if let Some(events) = args.events {
        config.event_count = events;
    }
    if let Some(ref dir) = args.output_dir {
        config.output = OutputPaths::in_dir(dir);
    }
    if let Some(ref path) = args.notebook {
        config.notebook_path = Some(path.clone());
    }
    if args.skip_notebook {
        config.notebook_path = None;
    }

    Ok(config)
}

/// Returns false when verification was requested and failed.
fn run(args: &Args) -> Result<bool> {
    let config = build_config(args)?;
    let (range, event_count) = config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    println!("Generating colony data with seed: {}", config.seed);
    println!("Date range: {} ({} days, {} events)", range, range.len(), event_count);

    let dataset = generate_dataset(&config, &mut rng)?;
    println!("Generation complete:");
    println!("{}", dataset.stats());

    if args.verify {
        println!("Verifying tables...");
        let report = verify_dataset(&dataset, &range);
        print!("{}", report);
        if !report.passed() {
            return Ok(false);
        }
    }

    println!("Writing tables...");
    write_dataset(&dataset, &config.output)?;
    for path in config.output.all() {
        println!("  {}", path.display());
    }

    if let Some(ref path) = config.notebook_path {
        println!("Writing starter notebook...");
        let notebook = starter_notebook(&config.output);
        write_notebook(&notebook, path)?;
        println!("  {}", path.display());
    }

    Ok(true)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("Verification failed; no tables written");
            process::exit(1);
        }
        Err(e) if e.is_config_error() => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(2);
        }
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            process::exit(1);
        }
    }
}
