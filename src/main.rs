//! # EcoPoint CLI
//!
//! Command-line front end for the ecopoint library: list collection points,
//! select them (resolving their routes), and search places.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ecopoint::{
    AppConfig, Catalog, Engine, Geocoder, OsrmProvider, RoutePath, Snapshot, Unavailable,
};
use log::{error, warn};

mod cli;

/// Command-line interface for ecopoint
#[derive(Parser)]
#[command(name = "ecopoint")]
#[command(about = "Recycling collection points with live route resolution")]
#[command(long_about = "Inspect recycling collection points and their routes:
  ecopoint list                        # Show the catalog
  ecopoint select centro               # Select a point and resolve its route
  ecopoint select centro rodoviaria    # Rapid reselection: only the last route wins
  ecopoint select mercado --details    # Also open the detail overlay
  ecopoint search \"Tianguá centro\"     # Geocode a place
  ecopoint search Sobral --go 1        # Center the map on the first result")]
#[command(version = env!("ECOPOINT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Collection point catalog (JSON); the built-in catalog is used otherwise
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// OSRM base URL
    #[arg(long, global = true)]
    routing_url: Option<String>,

    /// OSRM profile (driving, foot, bike)
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Give up on a route lookup after this many seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Show what would be requested without contacting any service
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List collection points
    List,

    /// Select collection points in order and resolve the last one's route
    Select {
        /// Point ids; each one supersedes the previous selection
        #[arg(required = true)]
        ids: Vec<String>,

        /// Open the detail overlay for the final selection
        #[arg(long)]
        details: bool,
    },

    /// Search places by name
    Search {
        /// Free-text query
        #[arg(required = true)]
        term: Vec<String>,

        /// Center the map on the N-th result (1-based)
        #[arg(long)]
        go: Option<usize>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("♻️  EcoPoint v{} starting...", env!("ECOPOINT_VERSION"));
    }

    let config = load_config(&cli)?;
    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::builtin(),
    };

    match &cli.command {
        Command::List => list(&catalog),
        Command::Select { ids, details } => {
            select(catalog, &config, ids, *details, cli.dry_run).await?
        }
        Command::Search { term, go } => {
            search(catalog, &config, &term.join(" "), *go, cli.dry_run).await?
        }
    }

    Ok(())
}

/// File (or defaults) first, then CLI flags on top
fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    if let Some(url) = &cli.routing_url {
        config.routing.base_url = url.clone();
    }
    if let Some(profile) = &cli.profile {
        config.routing.profile = profile.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.engine.resolve_timeout_ms = secs.saturating_mul(1000);
    }

    config.validate()?;
    Ok(config)
}

fn list(catalog: &Catalog) {
    for point in catalog.points() {
        let route = match point.waypoints.as_ref().map(Vec::len) {
            Some(n) if n >= 2 => format!("{n} waypoints"),
            _ => "no route".to_string(),
        };
        println!(
            "{:<14} {:<24} {}  [{route}]",
            point.id, point.name, point.coordinate
        );
        if !point.description.is_empty() {
            println!("{:<14} {}", "", point.description);
        }
    }
}

async fn select(
    catalog: Catalog,
    config: &AppConfig,
    ids: &[String],
    details: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let provider = OsrmProvider::new(config.routing.clone());

    if dry_run {
        for id in ids {
            let point = catalog.require(id)?;
            match point.waypoints.as_deref() {
                Some(w) if w.len() >= 2 => {
                    eprintln!("🔍 [DRY RUN] Would select {id} and request {}", provider.route_url(w))
                }
                _ => eprintln!("🔍 [DRY RUN] Would select {id} (no route to request)"),
            }
        }
        return Ok(());
    }

    let mut engine = Engine::new(
        catalog,
        Arc::new(provider),
        &config.engine,
        cli::ConsoleSurface::default(),
    );

    for id in ids {
        engine.select(id)?;
    }
    if details && !engine.view_details() {
        warn!("Nothing selected; no details to show");
    }

    if engine.pending_routes() > 0 {
        let progress = cli::RouteProgress::new(engine.pending_routes());
        while engine.process_next_completion().await.is_some() {
            progress.update(engine.pending_routes());
        }
        progress.finish();
    }

    print_snapshot(&engine.snapshot());
    Ok(())
}

async fn search(
    catalog: Catalog,
    config: &AppConfig,
    term: &str,
    go: Option<usize>,
    dry_run: bool,
) -> anyhow::Result<()> {
    if dry_run {
        eprintln!(
            "🔍 [DRY RUN] Would search '{term}' at {}/search",
            config.geocoder.base_url.trim_end_matches('/')
        );
        return Ok(());
    }

    let places = Geocoder::new(config.geocoder.clone()).search(term).await?;
    if places.is_empty() {
        eprintln!("No places found for '{term}'");
        return Ok(());
    }

    for (i, place) in places.iter().enumerate() {
        println!("{:>3}. {}  {}", i + 1, place.display_name, place.coordinate);
    }

    if let Some(n) = go {
        let place = n
            .checked_sub(1)
            .and_then(|i| places.get(i))
            .with_context(|| format!("no result #{n} (got {})", places.len()))?;

        let mut engine = Engine::new(
            catalog,
            Arc::new(OsrmProvider::new(config.routing.clone())),
            &config.engine,
            cli::ConsoleSurface::default(),
        );
        engine.focus(place.coordinate);
        print_snapshot(&engine.snapshot());
    }

    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    let selected = snapshot
        .entity
        .as_deref()
        .map(|p| format!("{} ({})", p.name, p.id))
        .unwrap_or_else(|| "nothing".to_string());

    let route = match &snapshot.resolved_path {
        RoutePath::Absent => "none".to_string(),
        RoutePath::Unavailable(Unavailable::NoWaypoints) => "unavailable (no waypoints)".to_string(),
        RoutePath::Unavailable(Unavailable::LookupFailed(reason)) => {
            format!("unavailable ({reason})")
        }
        RoutePath::Resolved(path) => format!("{} points", path.len()),
    };

    println!("Selected:   {selected}");
    println!("Center:     {}", snapshot.center);
    println!("Route:      {route}");
    println!("Generation: {}", snapshot.generation);
}
