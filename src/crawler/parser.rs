//! Listing page parser
//!
//! This module locates the price table in a fetched listing page and extracts:
//! - One [`PriceRecord`] per usable table row
//! - Whether the page offers a link to a further page

use crate::crawler::row::{extract_row, CellLink, RowCell, MIN_ROW_CELLS};
use crate::model::{PriceRecord, Zone};
use scraper::{ElementRef, Html, Selector};

/// Anchor texts that mark a "next page" control, matched case-sensitively
const NEXT_PAGE_TOKENS: &[&str] = &["下一页", "Next", ">"];

/// Extracted information from one listing page
#[derive(Debug, Clone, Default)]
pub struct ParsedListing {
    /// Accepted records in row order
    pub records: Vec<PriceRecord>,

    /// Whether a "next page" anchor was present
    pub has_next_page: bool,

    /// Number of body rows in the price table, usable or not
    pub rows_seen: usize,
}

/// Parses a listing page for one zone
///
/// # Table Rules
///
/// - The price table is the first `<table class="table">`.
/// - Only rows under its `<tbody>` are considered; rows with fewer than five
///   `<td>` cells are skipped.
/// - A missing table or body yields no records and no next page.
///
/// # Pagination
///
/// The next-page signal is the presence of an anchor outside the price table
/// whose text contains `下一页`, `Next` or `>`. Registrar links inside the
/// table never count, so a registrar named "NextNames" is not a pager.
///
/// # Example
///
/// ```
/// use tld_price_crawler::crawler::parse_listing_page;
/// use tld_price_crawler::model::Zone;
///
/// let html = r#"<table class="table"><tbody><tr>
///     <td><a href="/registrar/spaceship">Spaceship</a></td>
///     <td>5.62 美元</td><td>38.98 美元</td><td>--</td><td></td>
/// </tr></tbody></table>"#;
/// let parsed = parse_listing_page(html, &Zone::parse("io").unwrap(), 1);
/// assert_eq!(parsed.records.len(), 1);
/// assert!(!parsed.has_next_page);
/// ```
pub fn parse_listing_page(html: &str, zone: &Zone, page: u32) -> ParsedListing {
    let document = Html::parse_document(html);

    let Some(table) = find_price_table(&document) else {
        tracing::debug!("No price table on page {} of .{}", page, zone);
        return ParsedListing::default();
    };

    let rows = table_rows(table);
    if rows.is_empty() {
        tracing::debug!("Price table on page {} of .{} has no body rows", page, zone);
        return ParsedListing::default();
    }

    let rows_seen = rows.len();
    let records: Vec<PriceRecord> = rows
        .into_iter()
        .filter(|cells| cells.len() >= MIN_ROW_CELLS)
        .filter_map(|cells| extract_row(&cells, zone))
        .collect();

    tracing::debug!(
        "Page {} of .{}: {} rows, {} records",
        page,
        zone,
        rows_seen,
        records.len()
    );

    ParsedListing {
        records,
        has_next_page: has_next_page(&document, table),
        rows_seen,
    }
}

fn find_price_table(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("table.table").ok()?;
    document.select(&selector).next()
}

/// Collects the cells of every body row of the table
fn table_rows(table: ElementRef<'_>) -> Vec<Vec<RowCell>> {
    let (Ok(body_selector), Ok(row_selector), Ok(cell_selector)) = (
        Selector::parse("tbody"),
        Selector::parse("tr"),
        Selector::parse("td"),
    ) else {
        return Vec::new();
    };

    let Some(body) = table.select(&body_selector).next() else {
        return Vec::new();
    };

    body.select(&row_selector)
        .map(|row| row.select(&cell_selector).map(read_cell).collect())
        .collect()
}

fn read_cell(cell: ElementRef<'_>) -> RowCell {
    let link = Selector::parse("a")
        .ok()
        .and_then(|selector| cell.select(&selector).next())
        .map(|anchor| CellLink {
            href: anchor.value().attr("href").unwrap_or_default().to_string(),
            text: element_text(anchor),
        });

    RowCell {
        text: element_text(cell),
        link,
    }
}

/// Joins the trimmed text nodes of an element with single spaces
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn has_next_page(document: &Html, table: ElementRef<'_>) -> bool {
    let Ok(anchor_selector) = Selector::parse("a") else {
        return false;
    };

    document
        .select(&anchor_selector)
        .filter(|anchor| !anchor.ancestors().any(|node| node.id() == table.id()))
        .any(|anchor| {
            let text = element_text(anchor);
            NEXT_PAGE_TOKENS.iter().any(|token| text.contains(token))
        })
}
