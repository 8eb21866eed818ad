use crate::core::route::TravelMode;
use crate::domain::model::DragResult;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "itinerary-planner")]
#[command(about = "Headless travel itinerary planner")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Print pool snapshots as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the travel mode from config
    #[arg(long)]
    pub travel_mode: Option<TravelMode>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the itinerary and candidate pools
    Show,

    /// Apply drag gestures in order, e.g. `-g itinerary:0->candidates:1`
    Plan {
        #[arg(short = 'g', long = "gesture")]
        gestures: Vec<DragResult>,
    },

    /// Look up a place and add it to the candidates
    Add { query: String },

    /// Fetch directions for the itinerary
    Route,

    /// Ask the travel assistant
    Chat {
        message: String,

        /// Place names from the reply to add as candidates
        #[arg(long)]
        accept: Vec<String>,
    },
}
