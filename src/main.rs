use clap::Parser;
use std::time::Duration;

use moabom::collect::{self, CollectOptions};
use moabom::{DealError, DealSnapshot, RetailerConfig, apod, living_cost, watchlist};

mod args;
use args::{Args, Retailer, Source};

/// Rendered in place of an absent discount label
const NO_LABEL_PLACEHOLDER: &str = "-";

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(&args).await {
        ::log::error!("collection failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<(), DealError> {
    let client = collect::http_client(Duration::from_secs(args.timeout))?;

    match args.source {
        Source::Deals => {
            let retailer = match &args.config {
                Some(path) => RetailerConfig::from_file(path)?,
                None => match args.retailer {
                    Retailer::Costco => RetailerConfig::costco(),
                    Retailer::Traders => RetailerConfig::traders(),
                },
            };
            ::log::info!("collecting deals for {}", retailer.name);

            let opts = CollectOptions {
                snapshot_cap: args.snapshot_cap,
                ..Default::default()
            };
            let snapshot = collect::collect_deals(&client, &retailer, &opts).await?;

            if args.pretty {
                print_snapshot(&snapshot);
            } else {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
        }
        Source::Watchlist => {
            let cards = watchlist::live_cards(&client).await;
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        Source::LivingCost => {
            let snapshot = living_cost::get_living_cost_snapshot(&client).await;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Source::Apod => {
            let apod = apod::get_apod(&client).await?;
            println!("{}", serde_json::to_string_pretty(&apod)?);
        }
    }

    Ok(())
}

/// Human-readable rendering. An empty snapshot is a normal state, shown as
/// "no deals found" rather than treated as a failure.
fn print_snapshot(snapshot: &DealSnapshot) {
    println!("updated {} · {} deals", snapshot.updated_at, snapshot.total);

    if snapshot.items.is_empty() {
        println!("no deals found");
        return;
    }

    for item in &snapshot.items {
        let label = item.discount_label.as_deref().unwrap_or(NO_LABEL_PLACEHOLDER);
        println!("[{label}] {} · {}", item.title, item.url);
    }
}
