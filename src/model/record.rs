use crate::model::Zone;
use crate::price::Currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Provenance tag attached to every record scraped from the listing pages
pub const SOURCE_TAG: &str = "nazhumi_web";

/// Prefix marking registrar keys that were derived from a display name
pub const DISPLAY_NAME_KEY_PREFIX: &str = "name:";

/// Where a registrar's slug came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlugSource {
    /// Extracted from a `/registrar/<slug>` profile link
    ProfileLink,

    /// Derived from the display name because the link had no profile path
    DisplayName,
}

/// Registrar identity
///
/// Profile-link slugs are used verbatim as keys. Display-name slugs are keyed with a
/// `name:` prefix so that a name-derived slug never merges with a profile slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistrarId {
    pub slug: String,
    pub source: SlugSource,
}

impl RegistrarId {
    pub fn from_profile(slug: &str) -> Self {
        Self {
            slug: slug.to_lowercase(),
            source: SlugSource::ProfileLink,
        }
    }

    /// Builds a fallback identity: lowercase, spaces and periods removed
    pub fn from_display_name(name: &str) -> Self {
        let slug = name
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.')
            .collect();
        Self {
            slug,
            source: SlugSource::DisplayName,
        }
    }

    /// Key used for the registrar set, the support matrix and storage
    pub fn key(&self) -> String {
        match self.source {
            SlugSource::ProfileLink => self.slug.clone(),
            SlugSource::DisplayName => format!("{}{}", DISPLAY_NAME_KEY_PREFIX, self.slug),
        }
    }
}

/// One registrar's prices for one zone
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub zone: Zone,
    pub registrar: RegistrarId,
    pub registrar_name: String,
    /// External registrar site; empty when the listing has no link
    pub registrar_url: String,
    pub registration: Option<Decimal>,
    pub renewal: Option<Decimal>,
    pub transfer: Option<Decimal>,
    pub currency: Currency,
    pub crawled_at: DateTime<Utc>,
    pub source: &'static str,
}

impl PriceRecord {
    /// Storage and aggregation key for the registrar
    pub fn registrar_key(&self) -> String {
        self.registrar.key()
    }

    /// True when at least one of the three prices is present
    pub fn has_any_price(&self) -> bool {
        self.registration.is_some() || self.renewal.is_some() || self.transfer.is_some()
    }
}
