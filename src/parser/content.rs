//! Versioned page-content schema.
//!
//! Stored content is detected by shape once, then walked forward through one
//! migration per version until it reaches [`CURRENT_SCHEMA_VERSION`]:
//!
//! ```text
//! v0 { components: [...] }          legacy component list
//!  -> v1 { title, sections: [...] } legacy typed sections (`type` tag)
//!  -> v2 { mode: "simple", ... }    simple mode (`variationId`, untagged data)
//!  -> v3 { version: 3, ... }        current, typed section data
//! ```

use crate::domain::content::{PageContent, SectionInstance, CURRENT_SCHEMA_VERSION};
use crate::domain::theme::Theme;
use crate::domain::variation::{find_variation, SectionCategory};
use crate::editor::ids::generate_section_id;
use crate::parser::legacy::{resolve_component_type, translate_legacy_fields};
use derive_more::derive::Display;
use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum SchemaVersion {
    #[display("v0 (component list)")]
    LegacyComponents = 0,
    #[display("v1 (legacy sections)")]
    LegacySections = 1,
    #[display("v2 (simple mode)")]
    Simple = 2,
    #[display("v3")]
    Current = 3,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("content is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("content must be a JSON object")]
    NotAnObject,

    #[error("unsupported content version {0}")]
    UnsupportedVersion(u64),

    #[error("content does not match any known schema shape")]
    UnrecognisedShape,

    #[error("invalid {version} content: {reason}")]
    Invalid {
        version: SchemaVersion,
        reason: String,
    },
}

#[derive(Debug)]
pub struct Migrated {
    pub content: PageContent,
    pub from: SchemaVersion,
    pub warnings: Vec<String>,
}

/// Determines the schema version of a stored blob from its shape, without trial parsing.
pub fn detect_version(value: &Value) -> Result<SchemaVersion, SchemaError> {
    let obj = value.as_object().ok_or(SchemaError::NotAnObject)?;

    if let Some(version) = obj.get("version") {
        return match version.as_u64() {
            Some(0) => Ok(SchemaVersion::LegacyComponents),
            Some(1) => Ok(SchemaVersion::LegacySections),
            Some(2) => Ok(SchemaVersion::Simple),
            Some(3) => Ok(SchemaVersion::Current),
            Some(other) => Err(SchemaError::UnsupportedVersion(other)),
            None => Err(SchemaError::UnrecognisedShape),
        };
    }

    if obj.get("mode").and_then(Value::as_str) == Some("simple") {
        return Ok(SchemaVersion::Simple);
    }
    if obj.get("components").map_or(false, Value::is_array) {
        return Ok(SchemaVersion::LegacyComponents);
    }
    if obj.get("sections").map_or(false, Value::is_array) {
        return Ok(SchemaVersion::LegacySections);
    }

    Err(SchemaError::UnrecognisedShape)
}

/// Parses a stored content string and migrates it to the current schema.
pub fn migrate(raw: &str) -> Result<Migrated, SchemaError> {
    let value: Value = serde_json::from_str(raw)?;
    migrate_value(value)
}

pub fn migrate_value(value: Value) -> Result<Migrated, SchemaError> {
    let from = detect_version(&value)?;
    let mut warnings = Vec::new();
    let mut value = value;

    if from <= SchemaVersion::LegacyComponents {
        value = migrate_v0_to_v1(value, &mut warnings)?;
    }
    if from <= SchemaVersion::LegacySections {
        value = migrate_v1_to_v2(value, &mut warnings)?;
    }
    let content = if from <= SchemaVersion::Simple {
        migrate_v2_to_v3(value, &mut warnings)?
    } else {
        parse_current(value)?
    };

    Ok(Migrated {
        content,
        from,
        warnings,
    })
}

/// Like [`migrate`], but never fails: unreadable content becomes an empty page.
pub fn load_or_empty(raw: &str) -> PageContent {
    match migrate(raw) {
        Ok(migrated) => {
            for warning in &migrated.warnings {
                tracing::warn!(from = %migrated.from, "{}", warning);
            }
            migrated.content
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load page content, falling back to an empty page");
            PageContent::empty()
        }
    }
}

fn invalid(version: SchemaVersion, reason: impl Into<String>) -> SchemaError {
    SchemaError::Invalid {
        version,
        reason: reason.into(),
    }
}

fn take_array(obj: &mut Map<String, Value>, key: &str) -> Vec<Value> {
    match obj.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

// v0: { title?, components: [{ id?, type, props }] }
fn migrate_v0_to_v1(value: Value, warnings: &mut Vec<String>) -> Result<Value, SchemaError> {
    let Value::Object(mut obj) = value else {
        return Err(SchemaError::NotAnObject);
    };

    let mut sections = Vec::new();
    for (index, component) in take_array(&mut obj, "components").into_iter().enumerate() {
        let Value::Object(mut component) = component else {
            warnings.push(format!("component #{} is not an object, dropped", index));
            continue;
        };

        let component_type = component
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let Some(category) = resolve_component_type(&component_type) else {
            warnings.push(format!(
                "component #{} has unknown type '{}', dropped",
                index, component_type
            ));
            continue;
        };

        let props = match component.remove("props") {
            Some(Value::Object(props)) => props,
            _ => Map::new(),
        };

        let mut section = Map::new();
        if let Some(id) = component.remove("id") {
            section.insert("id".to_string(), id);
        }
        section.insert("type".to_string(), Value::from(category.to_string()));
        section.insert("order".to_string(), Value::from(index as u64));
        section.insert("data".to_string(), Value::Object(props));
        sections.push(Value::Object(section));
    }

    let title = obj.remove("title").unwrap_or_else(|| Value::from(""));
    Ok(json!({ "title": title, "sections": sections }))
}

// v1: { title, sections: [{ id?, type, order?, hidden?, data? | ...inline fields }] }
fn migrate_v1_to_v2(value: Value, warnings: &mut Vec<String>) -> Result<Value, SchemaError> {
    let Value::Object(mut obj) = value else {
        return Err(SchemaError::NotAnObject);
    };

    let mut sections = Vec::new();
    for (index, section) in take_array(&mut obj, "sections").into_iter().enumerate() {
        let Value::Object(mut section) = section else {
            warnings.push(format!("section #{} is not an object, dropped", index));
            continue;
        };

        let tag = match section.remove("type") {
            Some(Value::String(tag)) => tag,
            _ => String::new(),
        };
        let Some(category) =
            SectionCategory::from_tag(&tag).or_else(|| resolve_component_type(&tag))
        else {
            warnings.push(format!("section #{} has unknown type '{}', dropped", index, tag));
            continue;
        };

        let id = section.remove("id");
        let order = section
            .remove("order")
            .and_then(|o| o.as_u64())
            .unwrap_or(index as u64);
        let hidden = section
            .remove("hidden")
            .and_then(|h| h.as_bool())
            .unwrap_or(false);

        // payload is either nested under `data` or spread inline next to the tag
        let data = match section.remove("data") {
            Some(Value::Object(data)) => data,
            _ => section,
        };

        let mut migrated = Map::new();
        if let Some(id) = id {
            migrated.insert("id".to_string(), id);
        }
        migrated.insert(
            "variationId".to_string(),
            Value::from(category.default_variation().id),
        );
        migrated.insert("order".to_string(), Value::from(order));
        migrated.insert("hidden".to_string(), Value::from(hidden));
        migrated.insert(
            "data".to_string(),
            Value::Object(translate_legacy_fields(category, data)),
        );
        sections.push(Value::Object(migrated));
    }

    let mut simple = Map::new();
    simple.insert("mode".to_string(), Value::from("simple"));
    simple.insert(
        "title".to_string(),
        obj.remove("title").unwrap_or_else(|| Value::from("")),
    );
    simple.insert("sections".to_string(), Value::Array(sections));
    if let Some(theme) = obj.remove("theme") {
        simple.insert("theme".to_string(), theme);
    }
    Ok(Value::Object(simple))
}

// v2: { mode: "simple", title, sections: [{ id, variationId, order, hidden?|visible?, data }], theme }
fn migrate_v2_to_v3(value: Value, warnings: &mut Vec<String>) -> Result<PageContent, SchemaError> {
    let Value::Object(mut obj) = value else {
        return Err(SchemaError::NotAnObject);
    };

    let title = match obj.remove("title") {
        Some(Value::String(title)) => title,
        _ => String::new(),
    };

    let theme = match obj.remove("theme") {
        Some(theme) => serde_json::from_value::<Theme>(theme).unwrap_or_else(|e| {
            warnings.push(format!("theme could not be read ({}), default applied", e));
            Theme::default()
        }),
        None => Theme::default(),
    };

    let mut content = PageContent::titled(title, theme);

    for (index, section) in take_array(&mut obj, "sections").into_iter().enumerate() {
        match simple_section_to_current(section, index, &content) {
            Ok(section) => content.sections.push(section),
            Err(reason) => warnings.push(format!("section #{} dropped: {}", index, reason)),
        }
    }

    content.normalize_order();
    Ok(content)
}

fn simple_section_to_current(
    section: Value,
    index: usize,
    content: &PageContent,
) -> Result<SectionInstance, String> {
    let Value::Object(mut section) = section else {
        return Err("not an object".to_string());
    };

    let variation_id = section
        .get("variationId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let variation =
        find_variation(&variation_id).ok_or_else(|| format!("unknown variation '{}'", variation_id))?;

    let mut data = match section.remove("data") {
        Some(Value::Object(data)) => data,
        _ => Map::new(),
    };
    data.insert(
        "category".to_string(),
        Value::from(variation.category.to_string()),
    );
    let data = serde_json::from_value(Value::Object(data)).map_err(|e| e.to_string())?;

    // ids were client generated and may be missing or repeated
    let taken = content.sections.iter().map(|s| s.id.as_str());
    let id = match section.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() && content.section(id).is_none() => id.to_string(),
        _ => generate_section_id(taken),
    };

    let visible = match (
        section.get("visible").and_then(Value::as_bool),
        section.get("hidden").and_then(Value::as_bool),
    ) {
        (Some(visible), _) => visible,
        (None, Some(hidden)) => !hidden,
        (None, None) => true,
    };

    let order = section
        .get("order")
        .and_then(Value::as_u64)
        .unwrap_or(index as u64)
        .min(u64::from(u32::MAX)) as u32;

    Ok(SectionInstance {
        id,
        variation_id,
        order,
        visible,
        data,
    })
}

fn parse_current(value: Value) -> Result<PageContent, SchemaError> {
    let mut content: PageContent = serde_json::from_value(value)
        .map_err(|e| invalid(SchemaVersion::Current, e.to_string()))?;

    content
        .validate()
        .map_err(|e| invalid(SchemaVersion::Current, e.to_string()))?;

    content.version = CURRENT_SCHEMA_VERSION;
    content.normalize_order();
    Ok(content)
}
