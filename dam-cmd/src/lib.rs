//! Command implementations for the dam bulletin CLI.
//!
//! Provides subcommands for scraping the latest bulletin, backfilling a list
//! of dated bulletins, and summarising what is stored.

use clap::{Args, Subcommand};
use dam_core::fetch::{PageFetcher, LISTING_URL};
use dam_core::layout::ColumnLayout;
use dam_core::units::UnitSuffix;
use dam_store::{MergeMode, DEFAULT_DATA_DIR, DEFAULT_SNAPSHOT_PATH};
use std::path::PathBuf;

pub mod backfill;
pub mod latest;
pub mod pipeline;
pub mod source;
pub mod status;

pub use pipeline::Pipeline;
pub use source::PageSource;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory holding one history file per dam
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Path of the latest-bulletin snapshot file
    #[arg(long, global = true, default_value = DEFAULT_SNAPSHOT_PATH)]
    pub snapshot: PathBuf,

    /// Reference CSV (official_name,name,latitude,longitude,level_unit);
    /// the built-in dataset is used when omitted
    #[arg(long, global = true)]
    pub reference: Option<PathBuf>,

    /// Column layout of the bulletin table
    #[arg(long, global = true, value_enum, default_value_t = ColumnLayout::default())]
    pub layout: ColumnLayout,

    /// Suffix for levels converted from feet
    #[arg(long, global = true, value_enum, default_value_t = UnitSuffix::default())]
    pub unit_suffix: UnitSuffix,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scrape the newest bulletin and merge it into the stored histories
    Latest {
        /// Listing page whose first post is the newest bulletin
        #[arg(long, default_value = LISTING_URL)]
        listing_url: String,

        /// Let the reference data replace stored coordinates
        #[arg(long)]
        overwrite_geolocation: bool,
    },

    /// Merge a list of dated bulletins, oldest first
    Backfill {
        /// CSV of `date,url` rows, with a header
        #[arg(short = 'p', long)]
        pages: PathBuf,

        /// Let the reference data replace stored coordinates
        #[arg(long)]
        overwrite_geolocation: bool,
    },

    /// Print the newest stored observation of every dam
    Status,
}

fn merge_mode(overwrite_geolocation: bool) -> MergeMode {
    if overwrite_geolocation {
        MergeMode::Overwrite
    } else {
        MergeMode::PreserveGeolocation
    }
}

pub async fn run(global: GlobalArgs, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Latest {
            listing_url,
            overwrite_geolocation,
        } => {
            let pipeline = Pipeline::from_args(&global, merge_mode(overwrite_geolocation))?;
            let fetcher = PageFetcher::new()?;
            latest::run_latest(&fetcher, &pipeline, &listing_url).await?;
            Ok(())
        }
        Command::Backfill {
            pages,
            overwrite_geolocation,
        } => {
            let pipeline = Pipeline::from_args(&global, merge_mode(overwrite_geolocation))?;
            let pages = backfill::read_pages(&pages)?;
            let fetcher = PageFetcher::new()?;
            backfill::run_backfill(&fetcher, &pipeline, pages).await?;
            Ok(())
        }
        Command::Status => {
            let pipeline = Pipeline::from_args(&global, MergeMode::default())?;
            status::run_status(&pipeline.store)
        }
    }
}
