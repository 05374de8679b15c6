//! Pagination state and outcomes for a single zone crawl
//!
//! A zone is crawled page by page starting at 1. After each page the crawler
//! feeds the number of records found and the next-page signal into
//! [`CrawlState::after_page`], which decides whether to stop or move on.

use std::fmt;

/// Position of the zone crawler in its pagination loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    /// The given page is about to be fetched
    Fetching { page: u32 },

    /// The given page yielded records and advertised a further page
    HasResults { page: u32 },

    /// Nothing more to fetch for this zone
    Exhausted,
}

impl CrawlState {
    /// Initial state for every zone
    pub fn start() -> Self {
        Self::Fetching { page: 1 }
    }

    /// Transition after a page was parsed
    ///
    /// Zero records always exhausts the zone. Records without a next-page
    /// signal also exhaust it. Only records plus a next-page signal continue.
    pub fn after_page(self, records_found: usize, has_next_page: bool) -> Self {
        match self {
            Self::Fetching { page } if records_found > 0 && has_next_page => {
                Self::HasResults { page }
            }
            Self::Fetching { .. } => Self::Exhausted,
            other => other,
        }
    }

    /// Moves from `HasResults` to fetching the following page
    pub fn advance(self) -> Self {
        match self {
            Self::HasResults { page } => Self::Fetching { page: page + 1 },
            other => other,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

/// How a zone crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneOutcome {
    /// Every page was fetched until the listing ran out
    Complete,

    /// Stopped at the page cap while the listing still advertised more pages
    Truncated,

    /// Page 1 was fetched but yielded no records
    Empty,

    /// A page could not be fetched; the zone yields no records
    FetchFailed,
}

impl ZoneOutcome {
    /// True when the zone belongs in the failed-zone list
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Empty | Self::FetchFailed)
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Truncated => "truncated",
            Self::Empty => "empty",
            Self::FetchFailed => "fetch_failed",
        }
    }

    /// Returns None if the string doesn't match any known outcome.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "complete" => Some(Self::Complete),
            "truncated" => Some(Self::Truncated),
            "empty" => Some(Self::Empty),
            "fetch_failed" => Some(Self::FetchFailed),
            _ => None,
        }
    }
}

impl fmt::Display for ZoneOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
