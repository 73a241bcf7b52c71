use derive_more::derive::Display;
use serde::{Deserialize, Serialize};

/// The closed set of section categories a page can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
pub enum SectionCategory {
    #[display("hero")]
    Hero,
    #[display("about")]
    About,
    #[display("gallery")]
    Gallery,
    #[display("reviews")]
    Reviews,
    #[display("contact")]
    Contact,
    #[display("map")]
    Map,
    #[display("contactForm")]
    ContactForm,
    #[display("header")]
    Header,
    #[display("content")]
    Content,
    #[display("contactInfo")]
    ContactInfo,
}

impl SectionCategory {
    pub const ALL: [SectionCategory; 10] = [
        SectionCategory::Hero,
        SectionCategory::About,
        SectionCategory::Gallery,
        SectionCategory::Reviews,
        SectionCategory::Contact,
        SectionCategory::Map,
        SectionCategory::ContactForm,
        SectionCategory::Header,
        SectionCategory::Content,
        SectionCategory::ContactInfo,
    ];

    /// Parses a legacy section type tag (`hero`, `contactForm`, ...).
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.to_string() == tag)
    }

    /// First registered variation of the category, used when nothing more specific is known.
    pub fn default_variation(self) -> &'static Variation {
        VARIATIONS
            .iter()
            .find(|v| v.category == self)
            .unwrap_or(&VARIATIONS[0])
    }
}

/// A named layout choice for one section category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub id: &'static str,
    pub category: SectionCategory,
    pub name: &'static str,
}

const fn variation(id: &'static str, category: SectionCategory, name: &'static str) -> Variation {
    Variation { id, category, name }
}

pub static VARIATIONS: [Variation; 21] = [
    variation("hero-split-screen", SectionCategory::Hero, "Split screen"),
    variation("hero-centered", SectionCategory::Hero, "Centered"),
    variation("hero-fullscreen-image", SectionCategory::Hero, "Fullscreen image"),
    variation("about-story", SectionCategory::About, "Our story"),
    variation("about-with-image", SectionCategory::About, "Text with image"),
    variation("gallery-grid", SectionCategory::Gallery, "Grid"),
    variation("gallery-carousel", SectionCategory::Gallery, "Carousel"),
    variation("gallery-masonry", SectionCategory::Gallery, "Masonry"),
    variation("reviews-cards", SectionCategory::Reviews, "Cards"),
    variation("reviews-carousel", SectionCategory::Reviews, "Carousel"),
    variation("contact-simple", SectionCategory::Contact, "Simple"),
    variation("contact-split", SectionCategory::Contact, "Split with hours"),
    variation("map-embed", SectionCategory::Map, "Embedded map"),
    variation("contact-form-simple", SectionCategory::ContactForm, "Simple form"),
    variation("contact-form-with-details", SectionCategory::ContactForm, "Form with details"),
    variation("header-simple", SectionCategory::Header, "Simple"),
    variation("header-centered", SectionCategory::Header, "Centered logo"),
    variation("content-rich-text", SectionCategory::Content, "Rich text"),
    variation("content-two-column", SectionCategory::Content, "Two columns"),
    variation("contact-info-list", SectionCategory::ContactInfo, "List"),
    variation("contact-info-cards", SectionCategory::ContactInfo, "Cards"),
];

pub fn find_variation(id: &str) -> Option<&'static Variation> {
    VARIATIONS.iter().find(|v| v.id == id)
}

pub fn variations_for(category: SectionCategory) -> impl Iterator<Item = &'static Variation> {
    VARIATIONS.iter().filter(move |v| v.category == category)
}
