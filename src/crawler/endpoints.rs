use crate::model::Zone;

/// Listing URLs on the pricing site
///
/// A zone's landing page is `{base}/domain/{zone}` and its paginated listing is
/// `{base}/domain/{zone}/{page}`, with pages numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEndpoints {
    base: String,
}

impl ListingEndpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// URL probed during discovery
    pub fn zone_url(&self, zone: &Zone) -> String {
        format!("{}/domain/{}", self.base, zone)
    }

    /// URL of one listing page
    pub fn page_url(&self, zone: &Zone, page: u32) -> String {
        format!("{}/domain/{}/{}", self.base, zone, page)
    }
}
