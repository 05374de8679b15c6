//! Price cell normalization
//!
//! Listing cells hold free-form, bilingual price text such as `"5.62 美元"`,
//! `"¥69"` or `"--"`. This module turns one cell into an optional amount and an
//! optional currency.

use super::Currency;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

/// Cell contents that mean "no price listed"
const PLACEHOLDERS: &[&str] = &["", "-", "--", "N/A", "暂无"];

const USD_CUES: &[&str] = &["$", "美元", "USD"];
const EUR_CUES: &[&str] = &["€", "欧元", "EUR"];
const GBP_CUES: &[&str] = &["£", "英镑", "GBP"];
const CNY_CUES: &[&str] = &["¥", "￥", "人民币", "CNY"];

/// Characters that turn a following `元` into part of another currency's name
const FOREIGN_YUAN_PREFIXES: &[char] = &['美', '欧', '日', '港'];

/// Result of parsing one price cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsedPrice {
    /// The first decimal number in the cell, if any
    pub amount: Option<Decimal>,

    /// The detected currency, if the cell carried a cue or a bare number
    pub currency: Option<Currency>,
}

impl ParsedPrice {
    /// A cell with neither amount nor currency
    pub const ABSENT: ParsedPrice = ParsedPrice {
        amount: None,
        currency: None,
    };

    /// Returns true when neither an amount nor a currency was found
    pub fn is_absent(&self) -> bool {
        self.amount.is_none() && self.currency.is_none()
    }
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("number pattern is valid"))
}

/// Parses a raw price cell into an amount and a currency
///
/// # Rules
///
/// 1. Whitespace is trimmed; newlines and `,` thousands separators are removed
///    and full-width digits are folded to ASCII. Placeholder cells (`""`, `"-"`,
///    `"--"`, `"N/A"`, `"暂无"`) are absent.
/// 2. Currency cues are checked in priority order: USD, CNY, EUR, GBP.
///    Without any cue, a bare number is taken to be USD.
/// 3. The amount is the first decimal token in the cell. Without a token the
///    amount is absent even when a currency cue matched.
///
/// # Examples
///
/// ```
/// use tld_price_crawler::price::{parse_price, Currency};
///
/// let parsed = parse_price("5.62 美元");
/// assert_eq!(parsed.amount.map(|a| a.to_string()), Some("5.62".to_string()));
/// assert_eq!(parsed.currency, Some(Currency::Usd));
/// ```
pub fn parse_price(raw: &str) -> ParsedPrice {
    let trimmed = raw.trim();
    if is_placeholder(trimmed) {
        return ParsedPrice::ABSENT;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | ',' | '，'))
        .map(fold_full_width)
        .collect();

    let amount = number_pattern()
        .find(&cleaned)
        .and_then(|token| token.as_str().parse::<Decimal>().ok());

    let currency = match detect_currency(&cleaned) {
        Some(currency) => Some(currency),
        None if amount.is_some() => Some(Currency::Usd),
        None => None,
    };

    ParsedPrice { amount, currency }
}

/// Picks the display currency for a row: the first present currency in column order
pub fn first_currency(prices: &[ParsedPrice]) -> Option<Currency> {
    prices.iter().find_map(|p| p.currency)
}

/// Maps full-width digits and the full-width full stop to their ASCII forms
fn fold_full_width(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        '．' => '.',
        _ => c,
    }
}

fn is_placeholder(text: &str) -> bool {
    PLACEHOLDERS
        .iter()
        .any(|p| text == *p || (p.is_ascii() && text.eq_ignore_ascii_case(p)))
}

fn detect_currency(text: &str) -> Option<Currency> {
    let upper = text.to_uppercase();
    let has_any = |cues: &[&str]| cues.iter().any(|cue| upper.contains(cue));

    if has_any(USD_CUES) {
        Some(Currency::Usd)
    } else if has_any(CNY_CUES) || has_standalone_yuan(text) {
        Some(Currency::Cny)
    } else if has_any(EUR_CUES) {
        Some(Currency::Eur)
    } else if has_any(GBP_CUES) {
        Some(Currency::Gbp)
    } else {
        None
    }
}

/// `元` counts as a CNY cue unless it ends another currency's name such as `美元`
fn has_standalone_yuan(text: &str) -> bool {
    let mut previous = None;
    for ch in text.chars() {
        if ch == '元' && !previous.is_some_and(|p| FOREIGN_YUAN_PREFIXES.contains(&p)) {
            return true;
        }
        previous = Some(ch);
    }
    false
}
