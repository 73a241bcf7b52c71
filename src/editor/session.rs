//! # Editor session
//!
//! One editor's working copy of a page. Operations are applied locally and
//! remembered until the next successful save. Saves carry the version the
//! copy was loaded at; a stale save is rejected by the store, after which
//! [`EditorSession::rebase`] reloads the stored page and replays the
//! pending operations on top of it.

use crate::database::{ContentRepository, StoreError};
use crate::domain::content::PageContent;
use crate::domain::theme::Theme;
use crate::editor::operations::{EditError, SectionOp};
use crate::parser::content::{migrate, SchemaError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("stored content could not be read: {0}")]
    Schema(#[from] SchemaError),

    #[error("content could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    pub business_id: Uuid,
    pub content: PageContent,
    /// Stored version the working copy is based on (0 = never saved)
    pub base_version: i64,
    pending: Vec<SectionOp>,
}

impl EditorSession {
    /// Opens the stored page, or a blank one titled `title` with `theme` if nothing is stored yet.
    pub async fn open(
        repo: &dyn ContentRepository,
        business_id: Uuid,
        title: &str,
        theme: Theme,
    ) -> Result<Self, SessionError> {
        let (content, base_version) = match repo.get_content(business_id).await? {
            Some(stored) => (migrate(&stored.raw)?.content, stored.version),
            None => (PageContent::titled(title.to_string(), theme), 0),
        };

        Ok(Self::from_content(business_id, content, base_version))
    }

    pub fn from_content(business_id: Uuid, content: PageContent, base_version: i64) -> Self {
        Self {
            business_id,
            content,
            base_version,
            pending: Vec::new(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &[SectionOp] {
        &self.pending
    }

    pub fn apply(&mut self, mut op: SectionOp) -> Result<(), SessionError> {
        op.apply(&mut self.content)?;
        if let SectionOp::Add { id, .. } = &mut op {
            if id.is_none() {
                // the new section sorts last
                *id = self.content.sections.last().map(|s| s.id.clone());
            }
        }
        self.pending.push(op);
        Ok(())
    }

    /// Writes the whole page. Returns the new stored version.
    pub async fn save(&mut self, repo: &dyn ContentRepository) -> Result<i64, SessionError> {
        let raw = serde_json::to_string(&self.content)?;
        let version = repo
            .save_content(self.business_id, &raw, self.base_version)
            .await?;

        tracing::debug!(
            business_id = %self.business_id,
            version,
            ops = self.pending.len(),
            "Saved page content"
        );

        self.base_version = version;
        self.pending.clear();
        Ok(version)
    }

    /// Replaces the working copy with the stored page and replays pending ops.
    /// Ops that no longer apply (their section was removed meanwhile) are dropped
    /// and returned.
    pub async fn rebase(
        &mut self,
        repo: &dyn ContentRepository,
    ) -> Result<Vec<SectionOp>, SessionError> {
        let Some(stored) = repo.get_content(self.business_id).await? else {
            return Ok(Vec::new());
        };

        let mut content = migrate(&stored.raw)?.content;
        let mut kept = Vec::new();
        let mut dropped = Vec::new();

        for op in std::mem::take(&mut self.pending) {
            match op.apply(&mut content) {
                Ok(()) => kept.push(op),
                Err(e) => {
                    tracing::info!(error = %e, "Dropping pending edit during rebase");
                    dropped.push(op);
                }
            }
        }

        self.content = content;
        self.base_version = stored.version;
        self.pending = kept;
        Ok(dropped)
    }
}
