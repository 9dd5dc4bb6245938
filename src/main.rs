use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use fat32layout::{check_volume, compute, inspect_volume, validate, GeometryParams};

const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
const GIT_HASH: &str = env!("GIT_HASH");

fn version_long() -> String {
    format!(
        "{} (built at {} git:{})",
        env!("CARGO_PKG_VERSION"),
        BUILD_TIMESTAMP,
        GIT_HASH
    )
}

#[derive(Parser)]
#[command(name = "fat32layout")]
#[command(author, version, about = "Inspect and validate FAT32 volume layouts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display a FAT32 volume's geometry and region layout
    Info {
        /// Path to the device or image file
        device: String,
    },

    /// Validate a FAT32 volume's layout against the actual media size
    Check {
        /// Path to the device or image file
        device: String,
    },

    /// Compute a region layout from explicit geometry (no device access)
    Plan(PlanArgs),

    /// Show detailed version and build information
    Version,
}

#[derive(Args)]
struct PlanArgs {
    /// Bytes per sector (power of two)
    #[arg(long, default_value_t = 512)]
    bytes_per_sector: u32,

    /// Sectors per cluster (power of two)
    #[arg(long, default_value_t = 8)]
    sectors_per_cluster: u32,

    /// Number of FAT copies
    #[arg(long, default_value_t = 2)]
    fats: u32,

    /// Sectors per FAT copy
    #[arg(long)]
    sectors_per_fat: u32,

    /// FAT12/16-style root directory entries (0 for FAT32)
    #[arg(long, default_value_t = 0)]
    root_entries: u32,

    /// Reserved sectors before the first FAT
    #[arg(long, default_value_t = 32)]
    reserved: u32,

    /// Total data clusters
    #[arg(long)]
    clusters: u32,

    /// Total sectors available on the media (enables the size cross-check)
    #[arg(long)]
    total_sectors: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { device } => {
            let report = inspect_volume(&device)
                .with_context(|| format!("Failed to read volume layout from {}", device))?;
            println!("{}", report);
        }

        Commands::Check { device } => {
            let report = check_volume(&device)
                .with_context(|| format!("Failed to check volume layout on {}", device))?;
            print!("{}", report);
            if !report.is_ok() {
                std::process::exit(1);
            }
        }

        Commands::Plan(args) => {
            let params = GeometryParams {
                bytes_per_sector: args.bytes_per_sector,
                sectors_per_cluster: args.sectors_per_cluster,
                number_of_fats: args.fats,
                sectors_per_fat: args.sectors_per_fat,
                number_root_entries: args.root_entries,
                reserved_sector_count: args.reserved,
                number_of_clusters: args.clusters,
                total_sectors: args.total_sectors,
            };

            let layout = compute(&params).context("Failed to compute layout")?;

            println!("Planned layout:");
            println!("  Reserved:       {}", layout.reserved);
            println!("  FAT:            {}", layout.fat);
            println!("  Root directory: {}", layout.root_dir);
            println!("  Data:           {}", layout.data);
            println!("  Data clusters: {}", layout.cluster_count);
            println!("  Total sectors: {}", layout.total_sectors());

            validate(&layout, &params)
                .map_err(|violation| anyhow::anyhow!("Layout validation failed: {}", violation))?;
            println!("Layout OK");
        }

        Commands::Version => {
            println!("fat32layout {}", version_long());
        }
    }

    Ok(())
}
