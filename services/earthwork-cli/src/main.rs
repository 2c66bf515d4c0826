//! Earthwork cut/fill analysis CLI.
//!
//! Rasterizes survey epochs into height grids (cached on disk) and
//! integrates the volume change between two of them.

mod config;
mod pipeline;
mod report;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use earthwork_common::{BoundaryPoint, Point3D};
use gridifier::GridifierConfig;
use site_io::{FsGridStore, GridStore};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use volume_engine::{BoundaryWeighting, VolumeConfig};

use config::AnalysisConfig;
use pipeline::{align_frames, compute_volumes, rasterize_epoch, EpochGrid, EpochJob};
use report::VolumeReport;

#[derive(Parser, Debug)]
#[command(name = "earthwork")]
#[command(about = "Cut/fill volumes between surveyed terrain epochs", long_about = None)]
struct Cli {
    /// Log level
    #[arg(long, global = true, env = "EARTHWORK_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "EARTHWORK_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a full two-epoch analysis from a YAML file
    Analyze {
        /// Path to analysis YAML file
        config: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the per-cell difference map as JSON
        #[arg(long)]
        diff_map: Option<PathBuf>,

        /// Ignore cached grids
        #[arg(long)]
        refresh: bool,
    },

    /// Rasterize one epoch into the grid store
    Rasterize {
        /// Epoch name used in the store key
        #[arg(short, long)]
        epoch: String,

        /// OBJ files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// metadata.xml holding the survey origin
        #[arg(short, long)]
        metadata: Option<PathBuf>,

        /// Boundary CSV; aligns the grid to its first edge
        #[arg(short, long)]
        boundary: Option<PathBuf>,

        /// Cell edge length in metres
        #[arg(short, long, env = "EARTHWORK_GRID_SIZE", default_value = "0.5")]
        grid_size: f64,

        /// Grid store directory
        #[arg(long, env = "EARTHWORK_STORE_DIR", default_value = ".earthwork/grids")]
        store: PathBuf,

        /// Ignore a cached grid
        #[arg(long)]
        refresh: bool,
    },

    /// Compute volumes between two stored grids
    Volume {
        /// Store key of the earlier epoch
        before: String,

        /// Store key of the later epoch
        after: String,

        /// Boundary CSV restricting the integration
        #[arg(short, long)]
        boundary: Option<PathBuf>,

        /// Boundary weighting: exact, point, supersample[:n]
        #[arg(short, long)]
        weighting: Option<BoundaryWeighting>,

        /// Differences below this are treated as noise
        #[arg(long)]
        noise_threshold: Option<f64>,

        /// Grid store directory
        #[arg(long, env = "EARTHWORK_STORE_DIR", default_value = ".earthwork/grids")]
        store: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json)?;

    match cli.command {
        Commands::Analyze {
            config,
            output,
            diff_map,
            refresh,
        } => analyze(&config, &output, diff_map.as_deref(), refresh).await,
        Commands::Rasterize {
            epoch,
            inputs,
            metadata,
            boundary,
            grid_size,
            store,
            refresh,
        } => {
            let origin = load_origin(metadata.as_deref()).await?;
            let boundary = load_boundary(boundary.as_deref()).await?;
            let config = GridifierConfig::from_env();
            config.validate().map_err(anyhow::Error::msg)?;

            let job = EpochJob {
                name: &epoch,
                inputs: &inputs,
                origin,
                grid_size,
                boundary: boundary.as_deref(),
            };
            let store = FsGridStore::new(store);
            let EpochGrid { key, grid } = rasterize_epoch(&job, &config, &store, refresh).await?;
            println!("{}", key);
            println!(
                "  {} x {} cells, {} with data",
                grid.rows,
                grid.cols,
                grid.valid_count()
            );
            Ok(())
        }
        Commands::Volume {
            before,
            after,
            boundary,
            weighting,
            noise_threshold,
            store,
            output,
        } => {
            let store = FsGridStore::new(store);
            let grid1 = load_grid(&store, &before).await?;
            let grid2 = align_frames(&grid1, load_grid(&store, &after).await?)?;
            let boundary = load_boundary(boundary.as_deref()).await?;

            let mut config = VolumeConfig::from_env();
            if let Some(w) = weighting {
                config.weighting = w;
            }
            if let Some(t) = noise_threshold {
                config.noise_threshold = t;
            }
            config.validate().map_err(anyhow::Error::msg)?;

            let weighting = config.weighting.to_string();
            let result = compute_volumes(
                Arc::new(grid1),
                Arc::new(grid2),
                boundary.map(Arc::new),
                config,
            )
            .await?;
            let report = VolumeReport::new("volume", &before, &after, weighting, &result);
            print_report(&report, &output)
        }
    }
}

async fn analyze(path: &Path, output: &str, diff_map: Option<&Path>, refresh: bool) -> Result<()> {
    let config = AnalysisConfig::from_file(path)?;
    config.validate()?;
    info!(name = %config.name, grid_size = config.grid_size, "Loaded analysis");

    let shared_origin = load_origin(config.metadata.as_deref()).await?;
    let boundary = load_boundary(config.boundary.as_deref()).await?;
    let store = FsGridStore::new(&config.store_dir);
    let refresh = refresh || config.refresh;

    let mut grids = Vec::with_capacity(2);
    for epoch in [&config.before, &config.after] {
        let origin = match &epoch.metadata {
            Some(p) => load_origin(Some(p.as_path())).await?,
            None => shared_origin,
        };
        let job = EpochJob {
            name: &epoch.name,
            inputs: &epoch.inputs,
            origin,
            grid_size: config.grid_size,
            boundary: boundary.as_deref(),
        };
        let epoch_grid = rasterize_epoch(&job, &config.gridifier, &store, refresh).await?;
        info!(epoch = %epoch.name, key = %epoch_grid.key, "Epoch ready");
        grids.push(epoch_grid.grid);
    }
    let (Some(after), Some(before)) = (grids.pop(), grids.pop()) else {
        bail!("expected two rasterized epochs");
    };
    let after = align_frames(&before, after)?;

    let weighting = config.volume.weighting.to_string();
    let result = compute_volumes(
        Arc::new(before),
        Arc::new(after),
        boundary.map(Arc::new),
        config.volume.clone(),
    )
    .await?;

    if let Some(path) = diff_map {
        let json = serde_json::to_vec(&result.diff_map)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write diff map: {}", path.display()))?;
        info!(path = %path.display(), "Wrote difference map");
    }

    let report = VolumeReport::new(
        &config.name,
        &config.before.name,
        &config.after.name,
        weighting,
        &result,
    );
    print_report(&report, output)
}

fn print_report(report: &VolumeReport, output: &str) -> Result<()> {
    match output {
        "json" => println!("{}", report.format_json()?),
        _ => print!("{}", report.format_table()),
    }
    Ok(())
}

async fn load_origin(path: Option<&Path>) -> Result<Point3D> {
    match path {
        Some(p) => site_io::read_origin(p)
            .await
            .with_context(|| format!("Failed to read origin from {}", p.display())),
        None => Ok(Point3D::ZERO),
    }
}

async fn load_boundary(path: Option<&Path>) -> Result<Option<Vec<BoundaryPoint>>> {
    let Some(p) = path else {
        return Ok(None);
    };
    let points = site_io::read_boundary(p)
        .await
        .with_context(|| format!("Failed to read boundary from {}", p.display()))?;
    if points.len() < 3 {
        bail!("boundary {} has {} usable points, need 3", p.display(), points.len());
    }
    info!(points = points.len(), "Loaded boundary");
    Ok(Some(points))
}

async fn load_grid(store: &FsGridStore, key: &str) -> Result<earthwork_common::GridData> {
    store
        .load(key)
        .await?
        .with_context(|| format!("No grid stored under '{}' in {}", key, store.root().display()))
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.with_thread_ids(true).json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
