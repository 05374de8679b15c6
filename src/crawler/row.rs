//! Row extraction
//!
//! Turns the cells of one listing table row into a [`PriceRecord`]. Columns are:
//! registrar (linked), registration price, renewal price, transfer price, and an
//! action cell that usually links to the registrar's own site.

use crate::model::{PriceRecord, RegistrarId, Zone, SOURCE_TAG};
use crate::price::{first_currency, parse_price, Currency};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Rows with fewer cells than this are not price rows
pub const MIN_ROW_CELLS: usize = 5;

/// The first anchor found inside a cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellLink {
    pub href: String,
    pub text: String,
}

/// Text content and first link of one table cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowCell {
    pub text: String,
    pub link: Option<CellLink>,
}

impl RowCell {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            link: None,
        }
    }

    pub fn linked(text: &str, href: &str) -> Self {
        Self {
            text: text.to_string(),
            link: Some(CellLink {
                href: href.to_string(),
                text: text.to_string(),
            }),
        }
    }
}

fn profile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/registrar/([^/?#]+)").expect("profile pattern is valid"))
}

/// Derives the registrar identity from the column-0 link
///
/// A `/registrar/<slug>` path wins; otherwise the display name is normalized.
pub fn registrar_identity(href: &str, display_name: &str) -> RegistrarId {
    match profile_pattern().captures(href).and_then(|c| c.get(1)) {
        Some(slug) => RegistrarId::from_profile(slug.as_str()),
        None => {
            let id = RegistrarId::from_display_name(display_name);
            tracing::debug!(
                "No profile link for '{}', keying by display name as {}",
                display_name,
                id.key()
            );
            id
        }
    }
}

/// Extracts a record from one row, stamped with the current time
///
/// Returns `None` for rows that are not usable: too few cells, no registrar link,
/// no derivable registrar key, or no price in any of the three price columns.
pub fn extract_row(cells: &[RowCell], zone: &Zone) -> Option<PriceRecord> {
    extract_row_at(cells, zone, Utc::now())
}

/// Same as [`extract_row`] with an explicit crawl timestamp
pub fn extract_row_at(
    cells: &[RowCell],
    zone: &Zone,
    crawled_at: DateTime<Utc>,
) -> Option<PriceRecord> {
    if cells.len() < MIN_ROW_CELLS {
        return None;
    }

    let registrar_link = cells[0].link.as_ref()?;
    let registrar_name = registrar_link.text.trim().to_string();
    let registrar = registrar_identity(&registrar_link.href, &registrar_name);
    if registrar.slug.is_empty() {
        tracing::debug!("Dropping row in .{} with no registrar key", zone);
        return None;
    }

    let registrar_url = cells[4]
        .link
        .as_ref()
        .map(|link| link.href.trim().to_string())
        .unwrap_or_default();

    let prices = [
        parse_price(&cells[1].text),
        parse_price(&cells[2].text),
        parse_price(&cells[3].text),
    ];

    let record = PriceRecord {
        zone: zone.clone(),
        registrar,
        registrar_name,
        registrar_url,
        registration: prices[0].amount,
        renewal: prices[1].amount,
        transfer: prices[2].amount,
        currency: first_currency(&prices).unwrap_or(Currency::Usd),
        crawled_at,
        source: SOURCE_TAG,
    };

    if !record.has_any_price() {
        tracing::debug!(
            "Dropping row for {} in .{}: no parseable price",
            record.registrar_key(),
            zone
        );
        return None;
    }

    Some(record)
}
