use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSite {
    pub business_id: Uuid,
    pub html: String,
    pub etag: String,
}

impl RenderedSite {
    pub fn new(business_id: Uuid, html: String) -> Self {
        let etag = format!("\"{:016x}\"", xxhash_rust::xxh3::xxh3_64(html.as_bytes()));
        Self {
            business_id,
            html,
            etag,
        }
    }
}

// rendered published sites, keyed by subdomain, so public requests skip the db
#[derive(Debug, Default)]
pub struct SiteCache {
    pub sites_by_subdomain: HashMap<String, RenderedSite>,
}

impl SiteCache {
    pub fn new() -> Self {
        Self::default()
    }
}
