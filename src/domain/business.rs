use crate::domain::content::Review;
use chrono::{Datelike, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpeningHours {
    pub day: String,
    pub open: String,
    pub close: String,
}

/// SEO metadata as edited in the publish settings form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeoSettings {
    pub seo_title: String,
    pub seo_description: String,
    // comma separated, as typed by the user
    pub keywords: String,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub favicon: Option<String>,
}

impl SeoSettings {
    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// A local business as imported from its listing. Owned by the store, read by rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub hours: Vec<OpeningHours>,
    pub photos: Vec<String>,
    pub rating: Option<f32>,
    pub review_count: u32,
    pub reviews: Vec<Review>,
    pub subdomain: Option<String>,
    pub owner_id: Option<String>,
    pub is_published: bool,
    pub seo: SeoSettings,
    pub theme_preset: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Business {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category: category.into(),
            description: String::new(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            website: None,
            hours: Vec::new(),
            photos: Vec::new(),
            rating: None,
            review_count: 0,
            reviews: Vec::new(),
            subdomain: None,
            owner_id: None,
            is_published: false,
            seo: SeoSettings::default(),
            theme_preset: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Values substituted for `{{name}}` tokens in section text.
    pub fn template_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        vars.insert("businessName".to_string(), self.name.clone());
        vars.insert("businessCategory".to_string(), self.category.clone());
        vars.insert("businessDescription".to_string(), self.description.clone());
        vars.insert("address".to_string(), self.address.clone());
        vars.insert("phone".to_string(), self.phone.clone());
        vars.insert("email".to_string(), self.email.clone());
        vars.insert(
            "website".to_string(),
            self.website.clone().unwrap_or_default(),
        );
        vars.insert(
            "rating".to_string(),
            self.rating.map(|r| format!("{:.1}", r)).unwrap_or_default(),
        );
        vars.insert("reviewCount".to_string(), self.review_count.to_string());
        vars.insert(
            "subdomain".to_string(),
            self.subdomain.clone().unwrap_or_default(),
        );
        vars.insert("year".to_string(), Utc::now().year().to_string());
        vars
    }
}
