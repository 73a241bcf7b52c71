//! # Publishing
//!
//! A business moves `Unpublished -> Publishing -> Published` and back through
//! `Unpublishing`. The transient states only exist while the store calls are in
//! flight; the stored record carries a single `is_published` flag.

use crate::database::{BusinessRepository, StoreError};
use crate::publish::domain::{normalize_subdomain, site_url, DomainError};
use derive_more::Display;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PublishState {
    #[display("unpublished")]
    Unpublished,
    #[display("publishing")]
    Publishing,
    #[display("published")]
    Published,
    #[display("unpublishing")]
    Unpublishing,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    #[display("publish")]
    Publish,
    #[display("unpublish")]
    Unpublish,
}

impl PublishState {
    pub fn from_flag(is_published: bool) -> Self {
        if is_published {
            PublishState::Published
        } else {
            PublishState::Unpublished
        }
    }

    pub fn begin(self, action: PublishAction) -> Result<Self, PublishError> {
        match (self, action) {
            (PublishState::Unpublished, PublishAction::Publish) => Ok(PublishState::Publishing),
            (PublishState::Published, PublishAction::Unpublish) => Ok(PublishState::Unpublishing),
            (from, action) => Err(PublishError::InvalidTransition { from, action }),
        }
    }

    /// The side effects of the transition went through.
    pub fn complete(self) -> Self {
        match self {
            PublishState::Publishing => PublishState::Published,
            PublishState::Unpublishing => PublishState::Unpublished,
            settled => settled,
        }
    }

    /// The transition was abandoned; fall back to the state it started from.
    pub fn fail(self) -> Self {
        match self {
            PublishState::Publishing => PublishState::Unpublished,
            PublishState::Unpublishing => PublishState::Published,
            settled => settled,
        }
    }

    pub fn is_published(self) -> bool {
        self == PublishState::Published
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Business {0} not found")]
    NotFound(Uuid),

    #[error("A subdomain must be set before publishing")]
    NoDomain,

    #[error("Cannot {action} a business that is {from}")]
    InvalidTransition {
        from: PublishState,
        action: PublishAction,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PublishError {
    /// Short message suitable for a toast in the editor.
    pub fn user_message(&self) -> String {
        match self {
            PublishError::NotFound(_) => "This business no longer exists.".to_string(),
            PublishError::NoDomain => "Choose a subdomain before publishing.".to_string(),
            PublishError::InvalidTransition { from, .. } => {
                format!("The site is already {}.", from)
            }
            PublishError::Domain(e) => e.to_string(),
            PublishError::Store(StoreError::SubdomainTaken(sub)) => {
                format!("'{}' is already taken. Try another subdomain.", sub)
            }
            PublishError::Store(StoreError::AlreadyClaimed) => {
                "This business has already been claimed by another account.".to_string()
            }
            PublishError::Store(StoreError::NotFound { .. }) => {
                "This business no longer exists.".to_string()
            }
            PublishError::Store(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishOutcome {
    pub state: PublishState,
    pub subdomain: Option<String>,
    pub url: Option<String>,
}

pub struct Publisher {
    repo: Arc<dyn BusinessRepository>,
    root_domain: String,
}

impl Publisher {
    pub fn new(repo: Arc<dyn BusinessRepository>, root_domain: impl Into<String>) -> Self {
        Self {
            repo,
            root_domain: root_domain.into(),
        }
    }

    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// Claims the business for `user_id` if nobody owns it yet, then marks it published.
    ///
    /// If the claim succeeds but publishing fails, the business stays claimed
    /// and unpublished and the publish error is returned.
    pub async fn publish(
        &self,
        business_id: Uuid,
        user_id: &str,
    ) -> Result<PublishOutcome, PublishError> {
        let business = self
            .repo
            .get_business(business_id)
            .await?
            .ok_or(PublishError::NotFound(business_id))?;

        let Some(subdomain) = business.subdomain.clone() else {
            return Err(PublishError::NoDomain);
        };

        let state =
            PublishState::from_flag(business.is_published).begin(PublishAction::Publish)?;

        if business.owner_id.as_deref() != Some(user_id) {
            // also rejects a business owned by someone else
            self.repo.claim_business(business_id, user_id).await?;
        }

        if let Err(e) = self.repo.set_published(business_id, true).await {
            tracing::warn!(
                %business_id,
                error = %e,
                "Publish failed after claim; business left claimed and unpublished"
            );
            return Err(e.into());
        }

        let state = state.complete();
        let url = site_url(&subdomain, &self.root_domain);
        tracing::info!(%business_id, %url, "Published site");

        Ok(PublishOutcome {
            state,
            subdomain: Some(subdomain),
            url: Some(url),
        })
    }

    pub async fn unpublish(&self, business_id: Uuid) -> Result<PublishOutcome, PublishError> {
        let business = self
            .repo
            .get_business(business_id)
            .await?
            .ok_or(PublishError::NotFound(business_id))?;

        let state =
            PublishState::from_flag(business.is_published).begin(PublishAction::Unpublish)?;
        self.repo.set_published(business_id, false).await?;

        tracing::info!(%business_id, "Unpublished site");
        Ok(PublishOutcome {
            state: state.complete(),
            subdomain: business.subdomain,
            url: None,
        })
    }

    /// Validates and assigns a subdomain. Invalid input never reaches the store.
    pub async fn update_domain(
        &self,
        business_id: Uuid,
        input: &str,
    ) -> Result<PublishOutcome, PublishError> {
        let subdomain = normalize_subdomain(input)?;

        let business = self
            .repo
            .get_business(business_id)
            .await?
            .ok_or(PublishError::NotFound(business_id))?;

        self.repo.set_subdomain(business_id, &subdomain).await?;
        tracing::debug!(%business_id, %subdomain, "Assigned subdomain");

        let state = PublishState::from_flag(business.is_published);
        let url = state
            .is_published()
            .then(|| site_url(&subdomain, &self.root_domain));
        Ok(PublishOutcome {
            state,
            subdomain: Some(subdomain),
            url,
        })
    }
}
