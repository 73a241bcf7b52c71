//! Live preview protocol between the editor and the preview frame.
//!
//! The editor posts `{ type, data?, field?, value? }` messages. The preview
//! keeps its own copy of the page and business and re-renders after each one.
//! Messages from any origin other than the configured public origin are ignored.

use crate::domain::content::PageContent;
use crate::domain::theme::Theme;
use crate::domain::Business;
use crate::editor::operations::{EditError, SectionOp};
use crate::render::render_page;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreviewMessage {
    InitEditor { data: PreviewState },
    LiveUpdate { field: String, value: Value },
    ThemeUpdate { data: Theme },
    BusinessUpdate { data: Map<String, Value> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewState {
    pub content: PageContent,
    pub business: Business,
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Unsupported live update field: {0}")]
    UnsupportedField(String),

    #[error("No section at index {0}")]
    NoSection(usize),

    #[error("Invalid value for '{field}': expected {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("Business update rejected: {0}")]
    Business(#[from] serde_json::Error),
}

/// What the preview frame holds between messages.
pub struct PreviewSession {
    allowed_origin: String,
    state: PreviewState,
}

impl PreviewSession {
    pub fn new(allowed_origin: impl Into<String>, state: PreviewState) -> Self {
        Self {
            allowed_origin: allowed_origin.into(),
            state,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn render(&self) -> String {
        render_page(&self.state.content, &self.state.business)
    }

    /// Applies `message` if it came from the allowed origin.
    /// Returns whether the message was accepted.
    pub fn receive(&mut self, origin: &str, message: PreviewMessage) -> Result<bool, PreviewError> {
        if origin.trim_end_matches('/') != self.allowed_origin.trim_end_matches('/') {
            tracing::debug!(%origin, "Ignoring preview message from foreign origin");
            return Ok(false);
        }

        match message {
            PreviewMessage::InitEditor { data } => self.state = data,
            PreviewMessage::LiveUpdate { field, value } => self.live_update(&field, value)?,
            PreviewMessage::ThemeUpdate { data } => self.state.content.theme = data,
            PreviewMessage::BusinessUpdate { data } => self.merge_business(data)?,
        }
        Ok(true)
    }

    fn live_update(&mut self, field: &str, value: Value) -> Result<(), PreviewError> {
        if field == "title" {
            let title = value.as_str().ok_or_else(|| PreviewError::WrongType {
                field: field.to_string(),
                expected: "a string",
            })?;
            self.state.content.title = title.to_string();
            return Ok(());
        }

        let (index, rest) =
            split_section_field(field).ok_or_else(|| PreviewError::UnsupportedField(field.to_string()))?;
        let section = self
            .state
            .content
            .sections
            .get_mut(index)
            .ok_or(PreviewError::NoSection(index))?;

        if rest == "visible" {
            section.visible = value.as_bool().ok_or_else(|| PreviewError::WrongType {
                field: field.to_string(),
                expected: "a boolean",
            })?;
            return Ok(());
        }

        // `sections[0].data.headline` and `sections[0].headline` both address the payload
        let path = rest.strip_prefix("data.").unwrap_or(rest);
        let op = SectionOp::EditField {
            id: section.id.clone(),
            path: path.to_string(),
            value,
        };
        op.apply(&mut self.state.content)?;
        Ok(())
    }

    fn merge_business(&mut self, patch: Map<String, Value>) -> Result<(), PreviewError> {
        let mut current = serde_json::to_value(&self.state.business)?;
        if let Value::Object(fields) = &mut current {
            for (key, value) in patch {
                // identity is not editable from the preview
                if key == "id" {
                    continue;
                }
                fields.insert(key, value);
            }
        }
        self.state.business = serde_json::from_value(current)?;
        Ok(())
    }
}

/// Splits `sections[3].data.headline` into `(3, "data.headline")`.
fn split_section_field(field: &str) -> Option<(usize, &str)> {
    let rest = field.strip_prefix("sections[")?;
    let close = rest.find(']')?;
    let index = rest[..close].trim().parse().ok()?;
    let path = rest[close + 1..].strip_prefix('.')?;
    if path.is_empty() {
        return None;
    }
    Some((index, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_section_fields() {
        assert_eq!(
            split_section_field("sections[2].data.headline"),
            Some((2, "data.headline"))
        );
        assert_eq!(split_section_field("sections[0].visible"), Some((0, "visible")));
        assert_eq!(split_section_field("sections[x].visible"), None);
        assert_eq!(split_section_field("sections[1]"), None);
        assert_eq!(split_section_field("title"), None);
    }
}
