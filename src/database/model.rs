use crate::database::StoreError;
use crate::domain::Business;
use chrono::NaiveDateTime;
use derive_more::derive::Display;
use serde::de::DeserializeOwned;
use uuid::Uuid;

// list and struct fields are stored as JSON text columns
#[derive(sqlx::FromRow, Debug, PartialEq, Clone, Display)]
#[display("{} ({})", name, id)]
pub struct DbBusiness {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub hours: String,
    pub photos: String,
    pub rating: Option<f64>,
    pub review_count: i64,
    pub reviews: String,
    pub subdomain: Option<String>,
    pub owner_id: Option<String>,
    pub is_published: bool,
    pub seo: String,
    pub theme_preset: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(sqlx::FromRow, Debug, PartialEq, Eq, Clone)]
pub struct DbPageContent {
    pub business_id: String,
    pub content: String,
    pub version: i64,
    pub updated_at: NaiveDateTime,
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    // plain data structs, serialization cannot fail
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn from_json<T: DeserializeOwned>(column: &str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(format!("{}: {}", column, e)))
}

impl From<&Business> for DbBusiness {
    fn from(business: &Business) -> Self {
        Self {
            id: business.id.to_string(),
            name: business.name.clone(),
            category: business.category.clone(),
            description: business.description.clone(),
            address: business.address.clone(),
            phone: business.phone.clone(),
            email: business.email.clone(),
            website: business.website.clone(),
            hours: to_json(&business.hours),
            photos: to_json(&business.photos),
            rating: business.rating.map(f64::from),
            review_count: i64::from(business.review_count),
            reviews: to_json(&business.reviews),
            subdomain: business.subdomain.clone(),
            owner_id: business.owner_id.clone(),
            is_published: business.is_published,
            seo: to_json(&business.seo),
            theme_preset: business.theme_preset.clone(),
            created_at: business.created_at,
            updated_at: business.updated_at,
        }
    }
}

impl TryFrom<DbBusiness> for Business {
    type Error = StoreError;

    fn try_from(row: DbBusiness) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id).map_err(|e| StoreError::Corrupt(format!("id: {}", e)))?;

        Ok(Business {
            id,
            hours: from_json("hours", &row.hours)?,
            photos: from_json("photos", &row.photos)?,
            reviews: from_json("reviews", &row.reviews)?,
            seo: from_json("seo", &row.seo)?,
            name: row.name,
            category: row.category,
            description: row.description,
            address: row.address,
            phone: row.phone,
            email: row.email,
            website: row.website,
            rating: row.rating.map(|r| r as f32),
            review_count: u32::try_from(row.review_count).unwrap_or(0),
            subdomain: row.subdomain,
            owner_id: row.owner_id,
            is_published: row.is_published,
            theme_preset: row.theme_preset,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
