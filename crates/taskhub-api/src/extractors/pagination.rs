//! Pagination query parameter extractor.

use serde::{Deserialize, Deserializer};

use taskhub_core::types::pagination::PageRequest;

/// `?page=&limit=` on paginated endpoints. Each endpoint supplies its own
/// default page size; values that are not positive integers fall back to
/// the defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based).
    #[serde(default, deserialize_with = "lenient_u64")]
    pub page: Option<u64>,
    /// Items per page.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub limit: Option<u64>,
}

impl PaginationParams {
    /// Converts to a `PageRequest`, falling back to `default_limit`.
    pub fn into_page_request(self, default_limit: u64) -> PageRequest {
        PageRequest::from_query(self.page, self.limit, default_limit)
    }
}

/// Query values arrive as strings; anything unparseable becomes `None`.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}
