//! CLI commands implementation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;
use crate::models::{Crop, Disease, Treatment};
use crate::repository::DbContext;
use crate::taxonomy;

#[derive(Parser)]
#[command(name = "agrodoctor")]
#[command(about = "AI-assisted crop disease detection and treatment advice")]
#[command(version)]
pub struct Cli {
    /// Data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database schema
    Init,

    /// Populate the catalog from the bundled taxonomy
    Seed,

    /// Start the web server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1", env = "AGRO_HOST")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value = "8000", env = "AGRO_PORT")]
        port: u16,
    },
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Init => {
            settings.ensure_dirs()?;
            let ctx = settings.create_db_context();
            ctx.init_schema().await?;
            println!("Initialized database at {}", settings.database_url());
            Ok(())
        }
        Commands::Seed => {
            settings.ensure_dirs()?;
            let ctx = settings.create_db_context();
            ctx.init_schema().await?;
            let report = seed_catalog(&ctx).await?;
            println!(
                "Seeded {} crops, {} diseases, {} treatments",
                report.crops, report.diseases, report.treatments
            );
            Ok(())
        }
        Commands::Serve { host, port } => crate::server::serve(&settings, &host, port).await,
    }
}

/// Scientific names for the crops the classifier knows.
const SCIENTIFIC_NAMES: &[(&str, &str)] = &[
    ("Apple", "Malus domestica"),
    ("Blueberry", "Vaccinium corymbosum"),
    ("Cherry", "Prunus avium"),
    ("Corn", "Zea mays"),
    ("Grape", "Vitis vinifera"),
    ("Orange", "Citrus sinensis"),
    ("Peach", "Prunus persica"),
    ("Pepper,_bell", "Capsicum annuum"),
    ("Potato", "Solanum tuberosum"),
    ("Raspberry", "Rubus idaeus"),
    ("Soybean", "Glycine max"),
    ("Squash", "Cucurbita pepo"),
    ("Strawberry", "Fragaria ananassa"),
    ("Tomato", "Solanum lycopersicum"),
];

/// Counts of catalog rows created by a seed run.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedReport {
    pub crops: u64,
    pub diseases: u64,
    pub treatments: u64,
}

/// Derive catalog rows from the taxonomy: one crop per label prefix, one
/// disease per non-healthy label, one treatment per disease carrying the
/// taxonomy advice. Idempotent: existing rows are left alone.
pub async fn seed_catalog(ctx: &DbContext) -> anyhow::Result<SeedReport> {
    let crops = ctx.crops();
    let diseases = ctx.diseases();
    let mut report = SeedReport::default();

    for label in taxonomy::CLASS_LABELS {
        let Some((crop_name, disease_name)) = label.split_once("___") else {
            continue; // "Not a plant" has no catalog identity
        };

        let crop_id = match crops.find_by_name(crop_name).await? {
            Some(crop) => crop.id,
            None => {
                let scientific = SCIENTIFIC_NAMES
                    .iter()
                    .find(|(name, _)| *name == crop_name)
                    .map(|(_, sci)| *sci)
                    .unwrap_or_default();
                let id = crops
                    .insert(&Crop::new(
                        crop_name.to_string(),
                        scientific.to_string(),
                        String::new(),
                    ))
                    .await?;
                report.crops += 1;
                id
            }
        };

        if disease_name == "healthy" {
            continue;
        }

        if diseases.find_by_name(crop_id, disease_name).await?.is_none() {
            let disease_id = diseases
                .insert(&Disease::new(crop_id, disease_name.to_string()))
                .await?;
            report.diseases += 1;

            diseases
                .insert_treatment(&Treatment::new(
                    disease_id,
                    "Recommended treatment".to_string(),
                    taxonomy::advice_for(label).to_string(),
                ))
                .await?;
            report.treatments += 1;
        }
    }

    tracing::info!(
        crops = report.crops,
        diseases = report.diseases,
        treatments = report.treatments,
        "seeded catalog from taxonomy"
    );
    Ok(report)
}
