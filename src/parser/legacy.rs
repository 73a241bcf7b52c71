use crate::domain::variation::SectionCategory;
use serde_json::{Map, Value};

// legacy component type names, as written by the old component-list editor
const COMPONENT_REGISTRY: &[(&str, SectionCategory)] = &[
    ("hero", SectionCategory::Hero),
    ("herosection", SectionCategory::Hero),
    ("banner", SectionCategory::Hero),
    ("about", SectionCategory::About),
    ("aboutsection", SectionCategory::About),
    ("gallery", SectionCategory::Gallery),
    ("photogallery", SectionCategory::Gallery),
    ("reviews", SectionCategory::Reviews),
    ("testimonials", SectionCategory::Reviews),
    ("contact", SectionCategory::Contact),
    ("contactsection", SectionCategory::Contact),
    ("map", SectionCategory::Map),
    ("location", SectionCategory::Map),
    ("contactform", SectionCategory::ContactForm),
    ("form", SectionCategory::ContactForm),
    ("header", SectionCategory::Header),
    ("navbar", SectionCategory::Header),
    ("navigation", SectionCategory::Header),
    ("content", SectionCategory::Content),
    ("text", SectionCategory::Content),
    ("richtext", SectionCategory::Content),
    ("contactinfo", SectionCategory::ContactInfo),
];

/// Resolves a legacy component type (`HeroSection`, `hero`, `contact-form`) to a category.
pub fn resolve_component_type(component_type: &str) -> Option<SectionCategory> {
    let normalized: String = component_type
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    COMPONENT_REGISTRY
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, category)| *category)
}

// (legacy key, current key)
fn field_aliases(category: SectionCategory) -> &'static [(&'static str, &'static str)] {
    match category {
        SectionCategory::Hero => &[
            ("title", "headline"),
            ("subtitle", "subheadline"),
            ("buttonText", "ctaText"),
            ("buttonLink", "ctaLink"),
            ("image", "backgroundImage"),
        ],
        SectionCategory::About => &[("title", "heading"), ("content", "body"), ("text", "body")],
        SectionCategory::Gallery => &[("title", "heading"), ("photos", "images")],
        SectionCategory::Reviews => &[("title", "heading"), ("items", "reviews")],
        SectionCategory::Contact => &[("title", "heading")],
        SectionCategory::Map => &[("title", "heading"), ("location", "address")],
        SectionCategory::ContactForm => &[
            ("title", "heading"),
            ("buttonText", "submitLabel"),
            ("email", "recipientEmail"),
        ],
        SectionCategory::Header => &[
            ("title", "businessName"),
            ("name", "businessName"),
            ("navItems", "links"),
        ],
        SectionCategory::Content => &[
            ("title", "heading"),
            ("content", "markdown"),
            ("text", "markdown"),
            ("body", "markdown"),
        ],
        SectionCategory::ContactInfo => &[("title", "heading"), ("entries", "items")],
    }
}

/// Renames legacy payload keys to their current names and reshapes the few
/// fields whose structure changed. Keys already in current form win.
pub fn translate_legacy_fields(category: SectionCategory, mut fields: Map<String, Value>) -> Map<String, Value> {
    for (legacy, current) in field_aliases(category) {
        if fields.contains_key(*current) {
            fields.remove(*legacy);
            continue;
        }
        if let Some(value) = fields.remove(*legacy) {
            fields.insert(current.to_string(), value);
        }
    }

    match category {
        SectionCategory::Gallery => {
            if let Some(Value::Array(images)) = fields.get_mut("images") {
                for image in images.iter_mut() {
                    if let Value::String(url) = image {
                        let url = std::mem::take(url);
                        *image = serde_json::json!({ "url": url });
                    }
                }
            }
        }
        SectionCategory::Reviews => {
            if let Some(Value::Array(reviews)) = fields.get_mut("reviews") {
                for review in reviews.iter_mut() {
                    if let Value::Object(obj) = review {
                        rename_key(obj, "name", "author");
                        rename_key(obj, "comment", "text");
                        if let Some(rating) = obj.get("rating").and_then(Value::as_f64) {
                            obj.insert("rating".to_string(), Value::from(rating.round().clamp(0.0, 5.0) as u64));
                        }
                    }
                }
            }
        }
        _ => {}
    }

    fields
}

fn rename_key(obj: &mut Map<String, Value>, from: &str, to: &str) {
    if obj.contains_key(to) {
        return;
    }
    if let Some(value) = obj.remove(from) {
        obj.insert(to.to_string(), value);
    }
}
