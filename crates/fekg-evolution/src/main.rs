//! CLI entry point for the fekg-evolution link resolver.
//!
//! Reads events and evolution links from JSON snapshots (or stdin),
//! writes JSON results to stdout, and logs to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use fekg_core::{EventId, FekgConfig};
use fekg_evolution::{
    event_types, link_breakdowns, list_events, ConnectionsReport, EventListing,
    EvolutionLinkResolver,
};
use fekg_store::{Snapshot, SnapshotStore};

#[derive(Parser)]
#[command(name = "fekg-evolution")]
#[command(about = "Evolution-link resolution for the FE-EKG knowledge graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Snapshot file(s) of events and/or links; repeat to merge. Reads stdin if omitted.
    #[arg(short, long, global = true)]
    snapshot: Vec<PathBuf>,

    /// Config file prefix (default: fekg).
    #[arg(short, long, default_value = "fekg", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Split the links around a focal event into outgoing and incoming views.
    Resolve {
        /// Focal event ID.
        #[arg(long)]
        event: String,
        /// Exclude links scoring below this (overrides config).
        #[arg(long)]
        min_score: Option<f64>,
        /// Lowest score first.
        #[arg(long)]
        ascending: bool,
        /// Emit a connections report with event labels instead of raw links.
        #[arg(long)]
        views: bool,
    },
    /// Emit the component-score breakdown of every link.
    Breakdown {
        /// Only links touching this event.
        #[arg(long)]
        event: Option<String>,
    },
    /// List events with optional filters and pagination.
    Events {
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long)]
        limit: Option<usize>,
        /// Event type to keep; repeat for several.
        #[arg(long = "type")]
        types: Vec<String>,
        /// Inclusive start date (YYYY-MM-DD).
        #[arg(long, default_value = "")]
        from: String,
        /// Inclusive end date (YYYY-MM-DD).
        #[arg(long, default_value = "")]
        to: String,
        /// Case-insensitive text in label or description.
        #[arg(long)]
        search: Option<String>,
        /// Print the distinct event types instead of events.
        #[arg(long)]
        list_types: bool,
    },
    /// Print the cache fingerprint of a resolve request.
    Fingerprint {
        #[arg(long)]
        event: String,
        #[arg(long)]
        min_score: Option<f64>,
        #[arg(long)]
        ascending: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = FekgConfig::load(&cli.config)?;
    let store = load_store(&cli.snapshot, &config)?;

    match cli.command {
        Command::Resolve {
            ref event,
            min_score,
            ascending,
            views,
        } => {
            let resolver = build_resolver(&config, min_score, ascending);
            let resolved = resolver.resolve_from_store(
                &store,
                &EventId::from(event.as_str()),
                config.links.default_min_score,
            )?;
            if views {
                let report = ConnectionsReport::build(&resolved, &store.events_by_id());
                println!("{}", serde_json::to_string(&report)?);
            } else {
                println!("{}", serde_json::to_string(&resolved)?);
            }
        }
        Command::Breakdown { ref event } => {
            let event_id = event.as_deref().map(EventId::from);
            let rows = link_breakdowns(&store, event_id.as_ref())?;
            println!("{}", serde_json::to_string(&rows)?);
        }
        Command::Events {
            offset,
            limit,
            types,
            from,
            to,
            search,
            list_types,
        } => {
            if list_types {
                println!("{}", serde_json::to_string(&event_types(&store)?)?);
                return Ok(());
            }

            let listing = EventListing {
                offset,
                limit,
                types,
                from,
                to,
                search,
            };
            let page = list_events(&store, &listing, &config.listing)?;
            println!("{}", serde_json::to_string(&page)?);
        }
        Command::Fingerprint {
            ref event,
            min_score,
            ascending,
        } => {
            let resolver = build_resolver(&config, min_score, ascending);
            let fp = resolver.fingerprint_from_store(
                &store,
                &EventId::from(event.as_str()),
                config.links.default_min_score,
            )?;
            println!("{}", serde_json::json!({ "event_id": event, "fingerprint": fp }));
        }
    }

    Ok(())
}

fn build_resolver(
    config: &FekgConfig,
    min_score: Option<f64>,
    ascending: bool,
) -> EvolutionLinkResolver {
    let mut resolver = EvolutionLinkResolver::from_config(config);
    if let Some(min) = min_score {
        resolver = resolver.with_min_score(min);
    }
    if ascending {
        resolver = resolver.with_sort_descending(false);
    }
    resolver
}

/// Load and merge every snapshot given on the command line, falling back to
/// the configured snapshot path and then to stdin.
fn load_store(paths: &[PathBuf], config: &FekgConfig) -> anyhow::Result<SnapshotStore> {
    let mut paths = paths.to_vec();
    if paths.is_empty() {
        if let Some(configured) = &config.snapshot.path {
            paths.push(PathBuf::from(configured));
        }
    }

    if paths.is_empty() {
        tracing::debug!("Reading snapshot from stdin");
        let snapshot = Snapshot::from_reader(std::io::stdin().lock())?;
        return Ok(SnapshotStore::new(snapshot));
    }

    let mut merged = Snapshot::default();
    for path in &paths {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        merged = merged.merge(Snapshot::from_json_str(&raw)?);
    }
    tracing::info!(
        files = paths.len(),
        events = merged.events.len(),
        links = merged.evolution_links.len(),
        "Loaded snapshots"
    );
    Ok(SnapshotStore::new(merged))
}
