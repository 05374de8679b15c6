//! Price text normalization
//!
//! Parses listing cells into decimal amounts tagged with their origin currency.

mod currency;
mod normalize;

pub use currency::Currency;
pub use normalize::{first_currency, parse_price, ParsedPrice};
