use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tourguide::app::{ScriptRunner, TourController, parse_script};
use tourguide::config::TourConfig;
use tourguide::platform::{FileVisitedStore, MemoryPage};
use tourguide::store::{FileSource, spawn_loader};

#[derive(Parser, Debug)]
#[command(name = "tourguide", version)]
/// Replay a guided tour against a page description and save the overlay.
struct Cli {
    /// Step document JSON.
    #[arg(long)]
    steps: PathBuf,

    /// Page description JSON.
    #[arg(long)]
    page: PathBuf,

    /// Optional tour settings JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// File holding the "tour already seen" flag.
    #[arg(long, default_value = ".tourguide-visited")]
    visited: PathBuf,

    /// Output PNG path for the last overlay frame.
    #[arg(long)]
    out: PathBuf,

    /// How long to wait for the step document, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    load_timeout_ms: u64,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,

    /// Operations to replay: start, next, prev, skip, esc, reset,
    /// click:<selector>, type:<selector>=<value>, resize:WxH, scroll:Y, wait:MS
    script: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let ops = parse_script(&cli.script).context("parse script")?;

    let config = match &cli.config {
        Some(path) => TourConfig::load(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => TourConfig::default(),
    };
    let page = MemoryPage::load(&cli.page)
        .with_context(|| format!("load page '{}'", cli.page.display()))?;
    let visited = FileVisitedStore::new(&cli.visited);

    let (events, inbox) = mpsc::channel();
    let loader = spawn_loader(FileSource::new(&cli.steps), events);

    let mut tour = TourController::new(config, page, visited);
    if tour.should_prompt() {
        info!("first visit; the start prompt would be offered");
    }

    let mut runner = ScriptRunner::new(Instant::now());
    let deadline = Duration::from_millis(cli.load_timeout_ms);
    match inbox.recv_timeout(deadline) {
        Ok(event) => tour.handle(event, runner.now()),
        Err(_) => warn!("no steps within {}ms; replaying against an empty tour", cli.load_timeout_ms),
    }
    if loader.join().is_err() {
        warn!("step loader panicked");
    }

    for op in &ops {
        runner.apply(&mut tour, op);
        tour.drain(&inbox, runner.now());
    }
    runner.settle(&mut tour);

    info!(
        step = ?tour.state().current_index(),
        total = tour.total_steps(),
        showing = tour.state().is_showing(),
        "script finished"
    );

    let frame = tour
        .page()
        .frame()
        .context("no overlay was painted; did the script start the tour?")?;
    if let Some(parent) = cli.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .save_png(&cli.out)
        .with_context(|| format!("write png '{}'", cli.out.display()))?;

    eprintln!("wrote {}", cli.out.display());
    Ok(())
}
