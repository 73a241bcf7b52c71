use crate::domain::theme::Theme;
use crate::domain::variation::{find_variation, SectionCategory};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CURRENT_SCHEMA_VERSION: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub version: u32,
    pub title: String,
    pub sections: Vec<SectionInstance>,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionInstance {
    pub id: String,
    pub variation_id: String,
    pub order: u32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub data: SectionData,
}

fn default_visible() -> bool {
    true
}

/// Typed payload of a section, tagged by its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum SectionData {
    Hero(HeroData),
    About(AboutData),
    Gallery(GalleryData),
    Reviews(ReviewsData),
    Contact(ContactData),
    Map(MapData),
    ContactForm(ContactFormData),
    Header(HeaderData),
    Content(ContentData),
    ContactInfo(ContactInfoData),
}

impl SectionData {
    pub fn category(&self) -> SectionCategory {
        match self {
            SectionData::Hero(_) => SectionCategory::Hero,
            SectionData::About(_) => SectionCategory::About,
            SectionData::Gallery(_) => SectionCategory::Gallery,
            SectionData::Reviews(_) => SectionCategory::Reviews,
            SectionData::Contact(_) => SectionCategory::Contact,
            SectionData::Map(_) => SectionCategory::Map,
            SectionData::ContactForm(_) => SectionCategory::ContactForm,
            SectionData::Header(_) => SectionCategory::Header,
            SectionData::Content(_) => SectionCategory::Content,
            SectionData::ContactInfo(_) => SectionCategory::ContactInfo,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroData {
    pub headline: String,
    pub subheadline: String,
    pub cta_text: String,
    pub cta_link: String,
    pub background_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AboutData {
    pub heading: String,
    pub body: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryImage {
    pub url: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryData {
    pub heading: String,
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Review {
    pub author: String,
    pub rating: u8,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewsData {
    pub heading: String,
    pub show_rating: bool,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactData {
    pub heading: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub show_hours: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapData {
    pub heading: String,
    pub address: String,
    pub zoom: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: String,
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactFormData {
    pub heading: String,
    pub submit_label: String,
    pub recipient_email: String,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderData {
    pub business_name: String,
    pub logo: Option<String>,
    pub links: Vec<NavLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentData {
    pub heading: String,
    pub markdown: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactItem {
    pub label: String,
    pub value: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInfoData {
    pub heading: String,
    pub items: Vec<ContactItem>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ContentError {
    #[error("unknown variation '{0}'")]
    UnknownVariation(String),

    #[error("variation '{variation}' belongs to {expected}, section data is {actual}")]
    CategoryMismatch {
        variation: String,
        expected: SectionCategory,
        actual: SectionCategory,
    },

    #[error("duplicate section id '{0}'")]
    DuplicateId(String),
}

impl PageContent {
    pub fn empty() -> Self {
        Self::titled(String::new(), Theme::default())
    }

    pub fn titled(title: String, theme: Theme) -> Self {
        Self {
            version: CURRENT_SCHEMA_VERSION,
            title,
            sections: Vec::new(),
            theme,
        }
    }

    /// Sorts sections by `order` and re-indexes it to `0..n`.
    /// `order` is authoritative; array position follows it.
    pub fn normalize_order(&mut self) {
        self.sections.sort_by_key(|s| s.order);
        for (i, section) in self.sections.iter_mut().enumerate() {
            section.order = u32::try_from(i).unwrap_or(u32::MAX);
        }
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    pub fn section(&self, id: &str) -> Option<&SectionInstance> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut SectionInstance> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn visible_sections(&self) -> impl Iterator<Item = &SectionInstance> {
        self.sections.iter().filter(|s| s.visible)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        let mut seen = std::collections::HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.id.as_str()) {
                return Err(ContentError::DuplicateId(section.id.clone()));
            }
            section.validate_variation()?;
        }
        Ok(())
    }
}

impl SectionInstance {
    pub fn category(&self) -> SectionCategory {
        self.data.category()
    }

    pub fn validate_variation(&self) -> Result<(), ContentError> {
        let variation = find_variation(&self.variation_id)
            .ok_or_else(|| ContentError::UnknownVariation(self.variation_id.clone()))?;

        if variation.category != self.category() {
            return Err(ContentError::CategoryMismatch {
                variation: self.variation_id.clone(),
                expected: variation.category,
                actual: self.category(),
            });
        }
        Ok(())
    }
}
