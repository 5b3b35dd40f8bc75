//! MTG Common - shared vocabulary for the D2D pricing tools
//!
//! Finishes, currencies, exclusion rules, card type classification and the
//! Scryfall record shapes used by every crate that talks about printings.

pub mod card_type;
pub mod error;
pub mod finish;
pub mod scryfall;

pub use card_type::CardType;
pub use error::{Result, VocabularyError};
pub use finish::{Currency, Exclusion, Finish};
pub use scryfall::{
    CardFace, ImageUris, ScryfallAutocomplete, ScryfallCard, ScryfallError, ScryfallList,
    ScryfallPrices,
};
