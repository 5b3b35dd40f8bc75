//! Deck Bling - MTG decklist pricing
//!
//! Parses a decklist, looks up every printing of each card through ManaQL or
//! Scryfall, and picks the most expensive eligible printing and finish per card.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod decklist;
pub mod error;
pub mod formatters;
pub mod models;
pub mod normalize;
pub mod providers;
pub mod selection;
pub mod service;

// Re-export commonly used items
pub use cache::CardCache;
pub use config::{PricingConfig, ProviderKind};
pub use decklist::{
    export_decklist, export_result, parse_decklist, parse_decklist_report, read_decklist,
    ParsedDecklist,
};
pub use error::{BlingError, Result};
pub use formatters::{format_price, format_report};
pub use models::{
    CardOption, DeckPricingResult, DeckStats, LineItem, Printing, PrintingPrices, Submission,
    TreatmentPrice,
};
pub use providers::{create_data_source, CardDataSource, CardFailure, FetchedPrintings};
pub use service::PricingService;
