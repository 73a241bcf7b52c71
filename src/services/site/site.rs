use crate::database::{BusinessRepository, ContentRepository, StoreError};
use crate::domain::content::{ContentError, PageContent, CURRENT_SCHEMA_VERSION};
use crate::domain::theme::Theme;
use crate::domain::{Business, SeoSettings};
use crate::editor::{apply_all, EditError, SectionOp};
use crate::parser::content::migrate;
use crate::publish::{PublishError, PublishOutcome, Publisher};
use crate::render::render_page;
use crate::seo::{self, SeoReport};
use crate::services::site::cache::{RenderedSite, SiteCache};
use crate::services::site::manifest::SiteManifest;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Business {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("Invalid page content: {0}")]
    Content(#[from] ContentError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("Failed to serialize page content: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedPage {
    /// 0 when nothing has been saved yet
    pub version: i64,
    pub content: PageContent,
}

/// Owns page content, publishing and the public site cache for all businesses.
pub struct SiteService {
    businesses: Arc<dyn BusinessRepository>,
    content: Arc<dyn ContentRepository>,
    publisher: Publisher,
    // subdomain <-> business for published sites
    manifest: RwLock<SiteManifest>,
    cache: RwLock<SiteCache>,
}

impl SiteService {
    /// Builds the subdomain manifest from the published businesses in the store.
    pub async fn new(
        businesses: Arc<dyn BusinessRepository>,
        content: Arc<dyn ContentRepository>,
        root_domain: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let mut manifest = SiteManifest::new();
        for business in businesses.list_published().await? {
            if let Some(subdomain) = business.subdomain {
                manifest.insert(subdomain, business.id);
            }
        }
        tracing::info!(sites = manifest.len(), "Site manifest built");

        Ok(Self {
            publisher: Publisher::new(businesses.clone(), root_domain),
            businesses,
            content,
            manifest: RwLock::new(manifest),
            cache: RwLock::new(SiteCache::new()),
        })
    }

    pub fn root_domain(&self) -> &str {
        self.publisher.root_domain()
    }

    pub async fn business(&self, business_id: Uuid) -> Result<Business, SiteError> {
        self.businesses
            .get_business(business_id)
            .await?
            .ok_or(SiteError::NotFound(business_id))
    }

    pub async fn create_business(&self, business: Business) -> Result<Business, SiteError> {
        self.businesses.save_business(&business).await?;
        tracing::info!(business = %business.id, name = %business.name, "Created business");
        Ok(business)
    }

    /// Loads the stored page migrated to the current schema. A business without a
    /// stored page gets a blank one themed for its category. Unreadable content is
    /// logged and replaced by a blank page at the stored version so it can be overwritten.
    pub async fn load_page(&self, business_id: Uuid) -> Result<LoadedPage, SiteError> {
        let business = self.business(business_id).await?;
        let blank = || PageContent::titled(business.name.clone(), theme_for(&business));

        let Some(stored) = self.content.get_content(business_id).await? else {
            return Ok(LoadedPage {
                version: 0,
                content: blank(),
            });
        };

        let content = match migrate(&stored.raw) {
            Ok(migrated) => {
                for warning in &migrated.warnings {
                    tracing::warn!(%business_id, from = %migrated.from, "{}", warning);
                }
                migrated.content
            }
            Err(e) => {
                tracing::error!(%business_id, error = %e, "Stored page content is unreadable");
                blank()
            }
        };

        Ok(LoadedPage {
            version: stored.version,
            content,
        })
    }

    /// Writes the whole page if `expected_version` is still current.
    pub async fn save_page(
        &self,
        business_id: Uuid,
        expected_version: i64,
        mut content: PageContent,
    ) -> Result<i64, SiteError> {
        self.business(business_id).await?;
        content.validate()?;
        content.normalize_order();
        // the editor always sends current-shape sections
        content.version = CURRENT_SCHEMA_VERSION;

        let raw = serde_json::to_string(&content)?;
        let version = self
            .content
            .save_content(business_id, &raw, expected_version)
            .await?;

        self.invalidate(business_id).await;
        tracing::debug!(%business_id, version, sections = content.sections.len(), "Saved page");
        Ok(version)
    }

    /// Applies a batch of edits atomically and saves the result.
    pub async fn apply_operations(
        &self,
        business_id: Uuid,
        expected_version: i64,
        operations: &[SectionOp],
    ) -> Result<LoadedPage, SiteError> {
        let loaded = self.load_page(business_id).await?;
        if loaded.version != expected_version {
            return Err(StoreError::Conflict {
                expected: expected_version,
                actual: loaded.version,
            }
            .into());
        }

        let mut content = loaded.content;
        apply_all(&mut content, operations)?;
        let version = self
            .save_page(business_id, expected_version, content.clone())
            .await?;

        Ok(LoadedPage { version, content })
    }

    /// Rendered HTML of a published site, served from cache when possible.
    pub async fn render_site(&self, subdomain: &str) -> Result<Option<RenderedSite>, SiteError> {
        if let Some(site) = self.cache.read().await.sites_by_subdomain.get(subdomain) {
            return Ok(Some(site.clone()));
        }

        let known = self.manifest.read().await.business_for(subdomain);
        let business = match known {
            Some(id) => self.businesses.get_business(id).await?,
            None => self.businesses.get_business_by_subdomain(subdomain).await?,
        };
        let Some(business) = business.filter(|b| b.is_published) else {
            return Ok(None);
        };

        let page = self.load_page(business.id).await?;
        let site = RenderedSite::new(business.id, render_page(&page.content, &business));

        self.manifest
            .write()
            .await
            .insert(subdomain.to_string(), business.id);
        self.cache
            .write()
            .await
            .sites_by_subdomain
            .insert(subdomain.to_string(), site.clone());

        tracing::debug!(%subdomain, business = %business.id, "Rendered site");
        Ok(Some(site))
    }

    /// Renders any page for a business, published or not.
    pub async fn render_draft(&self, business_id: Uuid) -> Result<String, SiteError> {
        let business = self.business(business_id).await?;
        let page = self.load_page(business_id).await?;
        Ok(render_page(&page.content, &business))
    }

    pub async fn publish(
        &self,
        business_id: Uuid,
        user_id: &str,
    ) -> Result<PublishOutcome, SiteError> {
        let outcome = self.publisher.publish(business_id, user_id).await?;
        if let Some(subdomain) = &outcome.subdomain {
            self.manifest
                .write()
                .await
                .insert(subdomain.clone(), business_id);
        }
        self.invalidate(business_id).await;
        Ok(outcome)
    }

    pub async fn unpublish(&self, business_id: Uuid) -> Result<PublishOutcome, SiteError> {
        let outcome = self.publisher.unpublish(business_id).await?;
        self.invalidate(business_id).await;
        self.manifest.write().await.remove_by_business(business_id);
        Ok(outcome)
    }

    pub async fn update_domain(
        &self,
        business_id: Uuid,
        input: &str,
    ) -> Result<PublishOutcome, SiteError> {
        let outcome = self.publisher.update_domain(business_id, input).await?;

        // the old subdomain must stop serving
        self.invalidate(business_id).await;
        let mut manifest = self.manifest.write().await;
        manifest.remove_by_business(business_id);
        if let (true, Some(subdomain)) = (outcome.state.is_published(), &outcome.subdomain) {
            manifest.insert(subdomain.clone(), business_id);
        }
        Ok(outcome)
    }

    /// Stores the SEO form and returns its score.
    pub async fn update_seo(
        &self,
        business_id: Uuid,
        settings: &SeoSettings,
    ) -> Result<SeoReport, SiteError> {
        self.businesses.update_seo(business_id, settings).await?;
        self.invalidate(business_id).await;
        Ok(seo::evaluate(settings))
    }

    async fn invalidate(&self, business_id: Uuid) {
        let manifest = self.manifest.read().await;
        let mut cache = self.cache.write().await;
        match manifest.subdomain_for(business_id) {
            Some(subdomain) => {
                cache.sites_by_subdomain.remove(subdomain);
            }
            // sites rendered through a store lookup may not be in the manifest yet
            None => cache
                .sites_by_subdomain
                .retain(|_, site| site.business_id != business_id),
        }
    }
}

fn theme_for(business: &Business) -> Theme {
    match business.theme_preset.as_deref() {
        Some(preset) => Theme::for_category(preset),
        None => Theme::for_category(&business.category),
    }
}
