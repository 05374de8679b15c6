use serde::Serialize;
use std::fmt;

/// Currencies recognized in listing price cells
///
/// Values are never converted between currencies; the currency only records where
/// an amount came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Cny,
    Eur,
    Gbp,
}

impl Currency {
    /// Lowercase currency code used in records and storage
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Cny => "cny",
            Self::Eur => "eur",
            Self::Gbp => "gbp",
        }
    }

    /// Human-readable name stored next to the code
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Usd => "US Dollar",
            Self::Cny => "人民币",
            Self::Eur => "欧元",
            Self::Gbp => "英镑",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
