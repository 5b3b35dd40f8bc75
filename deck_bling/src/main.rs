//! Deck Bling - price the blingiest version of a decklist
//!
//! Reads a decklist from a file or stdin and prints the most expensive
//! eligible printing of every card.

use clap::{Parser, Subcommand};
use deck_bling::{
    export_result, format_report, parse_decklist, read_decklist, BlingError, LineItem,
    PricingConfig, PricingService, ProviderKind, Submission,
};
use mtg_common::{Currency, Exclusion, Finish};
use std::io::Read;
use std::path::PathBuf;

/// Find the most expensive printing of every card in a decklist
#[derive(Parser, Debug)]
#[command(name = "deck_bling")]
#[command(version, about, long_about = None)]
struct Args {
    /// Card data provider (overrides DECK_BLING_PROVIDER)
    #[arg(long, global = true)]
    provider: Option<ProviderKind>,

    /// Approximate missing EUR etched prices from USD etched prices
    #[arg(long, global = true, default_value_t = false)]
    approximate_eur_etched: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a decklist
    Price {
        /// Decklist file (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Currency for prices (usd or eur)
        #[arg(short, long, default_value_t = Currency::Usd)]
        currency: Currency,

        /// Allowed finish; repeat for several (default: all)
        #[arg(long = "finish")]
        finishes: Vec<Finish>,

        /// Exclude serialized or secret-lair printings; repeatable
        #[arg(long = "exclude")]
        exclusions: Vec<Exclusion>,

        /// Print the result as JSON
        #[arg(long, default_value_t = false, conflicts_with = "export")]
        json: bool,

        /// Print a Moxfield-style decklist of the selection
        #[arg(long, default_value_t = false)]
        export: bool,
    },
    /// Suggest card names for a prefix
    Autocomplete {
        /// Beginning of a card name
        prefix: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), BlingError> {
    let mut config = PricingConfig::from_env()?;
    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if args.approximate_eur_etched {
        config.approximate_eur_etched = true;
    }
    let service = PricingService::from_config(&config)?;

    match args.command {
        Command::Price {
            file,
            currency,
            finishes,
            exclusions,
            json,
            export,
        } => {
            let decklist = load_decklist(file)?;
            let finishes = if finishes.is_empty() {
                Finish::all().to_vec()
            } else {
                finishes
            };
            let submission = Submission::new(decklist, finishes, currency, exclusions)?;
            let result = service.process_decklist(&submission).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if export {
                println!("{}", export_result(&result, &submission.decklist));
            } else {
                print!("{}", format_report(&result, &submission.decklist, currency));
            }
        }
        Command::Autocomplete { prefix } => {
            for name in service.autocomplete(&prefix).await? {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

fn load_decklist(file: Option<PathBuf>) -> Result<Vec<LineItem>, BlingError> {
    let decklist = match file {
        Some(path) => read_decklist(&path)?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            parse_decklist(&text)
        }
    };
    if decklist.is_empty() {
        log::warn!("Decklist contains no recognisable card lines");
    }
    Ok(decklist)
}
