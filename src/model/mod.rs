//! Core data types shared by the crawl pipeline

mod record;
mod zone;

pub use record::{PriceRecord, RegistrarId, SlugSource, DISPLAY_NAME_KEY_PREFIX, SOURCE_TAG};
pub use zone::{Zone, ZoneError};
