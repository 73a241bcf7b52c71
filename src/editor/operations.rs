//! # Section operations
//!
//! Every edit a user can make to a page is one [`SectionOp`]. Operations are
//! validated before they touch the content, so a failed op leaves the page
//! unchanged.
//!
//! Ordering: `order` is authoritative. After every op the section list is
//! sorted by `order` and re-indexed to `0..n`, so array position always agrees.

use crate::domain::content::{PageContent, SectionData, SectionInstance};
use crate::domain::theme::Theme;
use crate::domain::variation::{find_variation, SectionCategory};
use crate::editor::defaults::default_data;
use crate::editor::ids::generate_section_id;
use crate::editor::path::{get_at, parse_path, set_at, PathError, PathSegment};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SectionOp {
    /// Append a section using the variation's category defaults, or the given payload
    Add {
        variation_id: String,
        #[serde(default)]
        data: Option<SectionData>,
        // kept when replaying an add so later edits still find the section
        #[serde(default)]
        id: Option<String>,
    },

    Remove {
        id: String,
    },

    MoveUp {
        id: String,
    },

    MoveDown {
        id: String,
    },

    /// Drag reorder: take the section at `from` and insert it at `to`
    Move {
        from: usize,
        to: usize,
    },

    ToggleVisibility {
        id: String,
    },

    /// Set one nested property of a section's payload, e.g. `reviews[0].author`
    EditField {
        id: String,
        path: String,
        value: Value,
    },

    /// Switch layout within the same category
    SetVariation {
        id: String,
        variation_id: String,
    },

    SetTitle {
        title: String,
    },

    SetTheme {
        theme: Theme,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum EditError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Unknown variation: {0}")]
    UnknownVariation(String),

    #[error("Variation {variation} is a {expected} layout, section is {actual}")]
    CategoryMismatch {
        variation: String,
        expected: SectionCategory,
        actual: SectionCategory,
    },

    #[error("Index {index} out of bounds ({len} sections)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Invalid field path: {0}")]
    Path(#[from] PathError),

    #[error("Field '{path}' does not exist on {category} sections")]
    UnknownField {
        path: String,
        category: SectionCategory,
    },

    #[error("Invalid value for '{path}': {reason}")]
    InvalidValue { path: String, reason: String },
}

impl SectionOp {
    /// Apply the op to `content`. On error `content` is left as it was.
    pub fn apply(&self, content: &mut PageContent) -> Result<(), EditError> {
        self.validate(content)?;

        match self {
            SectionOp::Add {
                variation_id,
                data,
                id,
            } => Self::apply_add(content, variation_id, data.clone(), id.clone()),
            SectionOp::Remove { id } => {
                content.sections.retain(|s| &s.id != id);
            }
            SectionOp::MoveUp { id } => Self::apply_swap(content, id, -1),
            SectionOp::MoveDown { id } => Self::apply_swap(content, id, 1),
            SectionOp::Move { from, to } => Self::apply_move(content, *from, *to),
            SectionOp::ToggleVisibility { id } => {
                if let Some(section) = content.section_mut(id) {
                    section.visible = !section.visible;
                }
            }
            SectionOp::EditField { id, path, value } => {
                Self::apply_edit_field(content, id, path, value.clone())?;
            }
            SectionOp::SetVariation { id, variation_id } => {
                if let Some(section) = content.section_mut(id) {
                    section.variation_id = variation_id.clone();
                }
            }
            SectionOp::SetTitle { title } => content.title = title.clone(),
            SectionOp::SetTheme { theme } => content.theme = theme.clone(),
        }

        content.normalize_order();
        Ok(())
    }

    fn validate(&self, content: &PageContent) -> Result<(), EditError> {
        match self {
            SectionOp::Add {
                variation_id,
                data,
                ..
            } => {
                let variation = find_variation(variation_id)
                    .ok_or_else(|| EditError::UnknownVariation(variation_id.clone()))?;
                if let Some(data) = data {
                    if data.category() != variation.category {
                        return Err(EditError::CategoryMismatch {
                            variation: variation_id.clone(),
                            expected: variation.category,
                            actual: data.category(),
                        });
                    }
                }
            }
            SectionOp::Remove { id }
            | SectionOp::MoveUp { id }
            | SectionOp::MoveDown { id }
            | SectionOp::ToggleVisibility { id }
            | SectionOp::EditField { id, .. } => {
                require(content, id)?;
            }
            SectionOp::Move { from, to: _ } => {
                if *from >= content.sections.len() {
                    return Err(EditError::IndexOutOfBounds {
                        index: *from,
                        len: content.sections.len(),
                    });
                }
            }
            SectionOp::SetVariation { id, variation_id } => {
                let section = require(content, id)?;
                let variation = find_variation(variation_id)
                    .ok_or_else(|| EditError::UnknownVariation(variation_id.clone()))?;
                if variation.category != section.category() {
                    return Err(EditError::CategoryMismatch {
                        variation: variation_id.clone(),
                        expected: variation.category,
                        actual: section.category(),
                    });
                }
            }
            SectionOp::SetTitle { .. } | SectionOp::SetTheme { .. } => {}
        }
        Ok(())
    }

    fn apply_add(
        content: &mut PageContent,
        variation_id: &str,
        data: Option<SectionData>,
        requested_id: Option<String>,
    ) {
        // validated above
        let Some(variation) = find_variation(variation_id) else {
            return;
        };

        let id = match requested_id {
            Some(id) if !id.is_empty() && content.section(&id).is_none() => id,
            _ => generate_section_id(content.sections.iter().map(|s| s.id.as_str())),
        };
        let order = content
            .sections
            .iter()
            .map(|s| s.order + 1)
            .max()
            .unwrap_or(0);
        content.sections.push(SectionInstance {
            id,
            variation_id: variation.id.to_string(),
            order,
            visible: true,
            data: data.unwrap_or_else(|| default_data(variation.category)),
        });
    }

    // swap with the neighbour; moving past either end is a no-op
    fn apply_swap(content: &mut PageContent, id: &str, direction: isize) {
        let Some(index) = content.position_of(id) else {
            return;
        };
        let Some(target) = index.checked_add_signed(direction) else {
            return;
        };
        if target >= content.sections.len() {
            return;
        }

        let a = content.sections[index].order;
        let b = content.sections[target].order;
        content.sections[index].order = b;
        content.sections[target].order = a;
    }

    fn apply_move(content: &mut PageContent, from: usize, to: usize) {
        let to = to.min(content.sections.len() - 1);
        let section = content.sections.remove(from);
        content.sections.insert(to, section);
        // positions are the new truth for a splice; carry them into `order`
        for (i, section) in content.sections.iter_mut().enumerate() {
            section.order = u32::try_from(i).unwrap_or(u32::MAX);
        }
    }

    fn apply_edit_field(
        content: &mut PageContent,
        id: &str,
        path: &str,
        value: Value,
    ) -> Result<(), EditError> {
        let segments = parse_path(path)?;
        let section = content
            .section_mut(id)
            .ok_or_else(|| EditError::SectionNotFound(id.to_string()))?;
        let category = section.category();

        let mut payload =
            serde_json::to_value(&section.data).map_err(|e| EditError::InvalidValue {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        if matches!(segments.first(), Some(PathSegment::Key(k)) if k == "category") {
            return Err(EditError::UnknownField {
                path: path.to_string(),
                category,
            });
        }

        set_at(&mut payload, &segments, value.clone())?;

        let edited: SectionData =
            serde_json::from_value(payload).map_err(|e| EditError::InvalidValue {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        // a key the payload type does not know is silently dropped by serde; catch that here
        let round_trip = serde_json::to_value(&edited).map_err(|e| EditError::InvalidValue {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        if get_at(&round_trip, &segments) != Some(&value) {
            return Err(EditError::UnknownField {
                path: path.to_string(),
                category,
            });
        }

        section.data = edited;
        Ok(())
    }
}

fn require<'c>(content: &'c PageContent, id: &str) -> Result<&'c SectionInstance, EditError> {
    content
        .section(id)
        .ok_or_else(|| EditError::SectionNotFound(id.to_string()))
}

/// Applies a batch to a working copy; `content` only changes if every op succeeds.
pub fn apply_all(content: &mut PageContent, ops: &[SectionOp]) -> Result<(), EditError> {
    let mut working = content.clone();
    for op in ops {
        op.apply(&mut working)?;
    }
    *content = working;
    Ok(())
}
