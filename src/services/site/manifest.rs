use std::collections::HashMap;
use uuid::Uuid;

// in-memory knowledge of which business answers on which subdomain.
// updated whenever a domain is assigned or a site is (un)published.
#[derive(Debug, Default)]
pub struct SiteManifest {
    pub subdomain_to_business: HashMap<String, Uuid>,
    pub business_to_subdomain: HashMap<Uuid, String>,
}

impl SiteManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `subdomain` to `business_id`, dropping any previous subdomain of that business.
    pub fn insert(&mut self, subdomain: String, business_id: Uuid) {
        if let Some(previous) = self
            .business_to_subdomain
            .insert(business_id, subdomain.clone())
        {
            self.subdomain_to_business.remove(&previous);
        }
        self.subdomain_to_business.insert(subdomain, business_id);
    }

    pub fn remove_by_business(&mut self, business_id: Uuid) -> Option<String> {
        let subdomain = self.business_to_subdomain.remove(&business_id)?;
        self.subdomain_to_business.remove(&subdomain);
        Some(subdomain)
    }

    pub fn business_for(&self, subdomain: &str) -> Option<Uuid> {
        self.subdomain_to_business.get(subdomain).copied()
    }

    pub fn subdomain_for(&self, business_id: Uuid) -> Option<&str> {
        self.business_to_subdomain
            .get(&business_id)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.subdomain_to_business.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subdomain_to_business.is_empty()
    }
}
