use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wrapper some list endpoints put around their rows, carrying page
/// metadata alongside the data array. Field names follow the backend's
/// casing; aliases cover the variants seen across endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope {
    #[serde(rename = "Data", alias = "data", alias = "items")]
    pub data: Vec<Value>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(rename = "pageSize", alias = "page_size", default)]
    pub page_size: u32,
    #[serde(rename = "totalRecords", alias = "total_records", default)]
    pub total_records: u64,
    #[serde(rename = "totalPages", alias = "total_pages", default)]
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

impl PageEnvelope {
    /// Wrap a full collection as a single page, the shape the backend uses
    /// when no paging parameters were supplied.
    pub fn single_page(data: Vec<Value>) -> Self {
        let total_records = data.len() as u64;
        Self {
            data,
            page: 1,
            page_size: total_records as u32,
            total_records,
            total_pages: 1,
        }
    }
}
