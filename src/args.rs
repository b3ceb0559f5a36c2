use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "moabom")]
#[command(about = "Aggregates retailer deals and public watchlist feeds into JSON snapshots")]
#[command(version)]
pub struct Args {
    /// Feed to collect
    #[arg(value_enum)]
    pub source: Source,

    /// Retailer configuration JSON file (overrides the built-in presets;
    /// only meaningful with the `deals` source)
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Built-in retailer preset to use with the `deals` source
    #[arg(short, long, value_enum, default_value_t = Retailer::Costco)]
    pub retailer: Retailer,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Maximum items kept in the final snapshot
    #[arg(long, default_value_t = 20)]
    pub snapshot_cap: usize,

    /// Render a human-readable table instead of JSON
    #[arg(short, long)]
    pub pretty: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Source {
    /// Retailer deal snapshot
    Deals,
    /// Dashboard watchlist cards (living-cost, fx, traffic)
    Watchlist,
    /// Living-cost price movers
    LivingCost,
    /// Astronomy picture of the day
    Apod,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Retailer {
    Costco,
    Traders,
}
