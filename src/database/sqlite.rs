use crate::analytics::events::{AnalyticsEvent, AnalyticsSummary};
use crate::database::model::{DbBusiness, DbPageContent};
use crate::database::{
    AnalyticsRepository, BusinessRepository, ContentRepository, StoreError, StoredContent,
};
use crate::domain::{Business, SeoSettings};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

pub struct SqliteRepository {
    pool: Pool<Sqlite>,
}

impl SqliteRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    async fn business_exists(&self, id: &str) -> Result<bool, StoreError> {
        let found: Option<(String,)> = sqlx::query_as("SELECT id FROM businesses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}

fn map_unique_subdomain(err: sqlx::Error, subdomain: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::SubdomainTaken(subdomain.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl ContentRepository for SqliteRepository {
    async fn get_content(&self, business_id: Uuid) -> Result<Option<StoredContent>, StoreError> {
        let row = sqlx::query_as::<_, DbPageContent>(
            "SELECT business_id, content, version, updated_at FROM page_contents WHERE business_id = ?",
        )
        .bind(business_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| StoredContent {
            raw: row.content,
            version: row.version,
            updated_at: row.updated_at,
        }))
    }

    async fn save_content(
        &self,
        business_id: Uuid,
        raw: &str,
        expected_version: i64,
    ) -> Result<i64, StoreError> {
        let id = business_id.to_string();
        let now = Utc::now().naive_utc();

        // the version check is part of the write itself, so two racing saves cannot both win
        let affected = if expected_version == 0 {
            sqlx::query(
                r#"
                INSERT INTO page_contents (business_id, content, version, updated_at)
                VALUES (?, ?, 1, ?)
                ON CONFLICT(business_id) DO NOTHING
                "#,
            )
            .bind(&id)
            .bind(raw)
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected()
        } else {
            sqlx::query(
                r#"
                UPDATE page_contents
                SET content = ?, version = version + 1, updated_at = ?
                WHERE business_id = ? AND version = ?
                "#,
            )
            .bind(raw)
            .bind(now)
            .bind(&id)
            .bind(expected_version)
            .execute(&self.pool)
            .await?
            .rows_affected()
        };

        if affected == 1 {
            return Ok(expected_version + 1);
        }

        let actual: Option<(i64,)> =
            sqlx::query_as("SELECT version FROM page_contents WHERE business_id = ?")
                .bind(&id)
                .fetch_optional(&self.pool)
                .await?;

        Err(StoreError::Conflict {
            expected: expected_version,
            actual: actual.map(|(v,)| v).unwrap_or(0),
        })
    }
}

#[async_trait]
impl BusinessRepository for SqliteRepository {
    async fn get_business(&self, id: Uuid) -> Result<Option<Business>, StoreError> {
        let row = sqlx::query_as::<_, DbBusiness>("SELECT * FROM businesses WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Business::try_from).transpose()
    }

    async fn get_business_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<Option<Business>, StoreError> {
        let row = sqlx::query_as::<_, DbBusiness>("SELECT * FROM businesses WHERE subdomain = ?")
            .bind(subdomain)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Business::try_from).transpose()
    }

    async fn list_published(&self) -> Result<Vec<Business>, StoreError> {
        let rows = sqlx::query_as::<_, DbBusiness>("SELECT * FROM businesses WHERE is_published = 1")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Business::try_from).collect()
    }

    async fn save_business(&self, business: &Business) -> Result<(), StoreError> {
        let row: DbBusiness = business.into();

        sqlx::query(
            r#"
            INSERT INTO businesses (
                id, name, category, description, address, phone, email, website,
                hours, photos, rating, review_count, reviews, subdomain, owner_id,
                is_published, seo, theme_preset, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                description = excluded.description,
                address = excluded.address,
                phone = excluded.phone,
                email = excluded.email,
                website = excluded.website,
                hours = excluded.hours,
                photos = excluded.photos,
                rating = excluded.rating,
                review_count = excluded.review_count,
                reviews = excluded.reviews,
                subdomain = excluded.subdomain,
                owner_id = excluded.owner_id,
                is_published = excluded.is_published,
                seo = excluded.seo,
                theme_preset = excluded.theme_preset,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.category)
        .bind(&row.description)
        .bind(&row.address)
        .bind(&row.phone)
        .bind(&row.email)
        .bind(&row.website)
        .bind(&row.hours)
        .bind(&row.photos)
        .bind(row.rating)
        .bind(row.review_count)
        .bind(&row.reviews)
        .bind(&row.subdomain)
        .bind(&row.owner_id)
        .bind(row.is_published)
        .bind(&row.seo)
        .bind(&row.theme_preset)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_subdomain(e, row.subdomain.as_deref().unwrap_or_default()))?;

        Ok(())
    }

    async fn claim_business(&self, id: Uuid, user_id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        let affected = sqlx::query(
            r#"
            UPDATE businesses SET owner_id = ?, updated_at = ?
            WHERE id = ? AND (owner_id IS NULL OR owner_id = ?)
            "#,
        )
        .bind(user_id)
        .bind(Utc::now().naive_utc())
        .bind(&id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 1 {
            return Ok(());
        }
        if self.business_exists(&id).await? {
            Err(StoreError::AlreadyClaimed)
        } else {
            Err(StoreError::NotFound {
                entity: "business",
                id,
            })
        }
    }

    async fn set_published(&self, id: Uuid, published: bool) -> Result<(), StoreError> {
        let affected = sqlx::query("UPDATE businesses SET is_published = ?, updated_at = ? WHERE id = ?")
            .bind(published)
            .bind(Utc::now().naive_utc())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::NotFound {
                entity: "business",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn set_subdomain(&self, id: Uuid, subdomain: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        let owner: Option<(String,)> =
            sqlx::query_as("SELECT id FROM businesses WHERE subdomain = ? AND id != ?")
                .bind(subdomain)
                .bind(&id)
                .fetch_optional(&self.pool)
                .await?;
        if owner.is_some() {
            return Err(StoreError::SubdomainTaken(subdomain.to_string()));
        }

        let affected = sqlx::query("UPDATE businesses SET subdomain = ?, updated_at = ? WHERE id = ?")
            .bind(subdomain)
            .bind(Utc::now().naive_utc())
            .bind(&id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_subdomain(e, subdomain))?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::NotFound {
                entity: "business",
                id,
            });
        }
        Ok(())
    }

    async fn update_seo(&self, id: Uuid, seo: &SeoSettings) -> Result<(), StoreError> {
        let seo_json =
            serde_json::to_string(seo).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let affected = sqlx::query("UPDATE businesses SET seo = ?, updated_at = ? WHERE id = ?")
            .bind(seo_json)
            .bind(Utc::now().naive_utc())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(StoreError::NotFound {
                entity: "business",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AnalyticsRepository for SqliteRepository {
    async fn record_event(&self, event: &AnalyticsEvent) -> Result<(), StoreError> {
        match event {
            AnalyticsEvent::VisitorUpserted {
                visitor_id,
                business_id,
                seen_at,
                user_agent,
            } => {
                sqlx::query(
                    r#"
                    INSERT INTO visitors (id, business_id, first_seen, last_seen, user_agent)
                    VALUES (?, ?, ?, ?, ?)
                    ON CONFLICT(id, business_id) DO UPDATE SET
                        last_seen = excluded.last_seen,
                        user_agent = COALESCE(excluded.user_agent, visitors.user_agent)
                    "#,
                )
                .bind(visitor_id)
                .bind(business_id.to_string())
                .bind(seen_at)
                .bind(seen_at)
                .bind(user_agent)
                .execute(&self.pool)
                .await?;
            }
            AnalyticsEvent::SessionStarted {
                session_id,
                visitor_id,
                business_id,
                started_at,
                landing_path,
                referrer,
            } => {
                sqlx::query(
                    r#"
                    INSERT OR IGNORE INTO sessions
                        (id, visitor_id, business_id, started_at, landing_path, referrer)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(session_id)
                .bind(visitor_id)
                .bind(business_id.to_string())
                .bind(started_at)
                .bind(landing_path)
                .bind(referrer)
                .execute(&self.pool)
                .await?;
            }
            AnalyticsEvent::PageView(view) => {
                sqlx::query(
                    r#"
                    INSERT INTO page_views
                        (id, business_id, visitor_id, session_id, path, referrer, started_at, load_time_ms)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(view.id.to_string())
                .bind(view.business_id.to_string())
                .bind(&view.visitor_id)
                .bind(&view.session_id)
                .bind(&view.path)
                .bind(&view.referrer)
                .bind(view.started_at)
                .bind(view.load_time_ms.map(|ms| i64::try_from(ms).unwrap_or(i64::MAX)))
                .execute(&self.pool)
                .await?;
            }
            AnalyticsEvent::PageViewUpdated(update) => {
                let affected = sqlx::query(
                    r#"
                    UPDATE page_views
                    SET time_on_page_ms = ?, scroll_depth = ?, clicks = ?, ended_at = ?
                    WHERE id = ? AND business_id = ?
                    "#,
                )
                .bind(i64::try_from(update.time_on_page_ms).unwrap_or(i64::MAX))
                .bind(i64::from(update.scroll_depth.min(100)))
                .bind(i64::from(update.clicks))
                .bind(update.ended_at)
                .bind(update.id.to_string())
                .bind(update.business_id.to_string())
                .execute(&self.pool)
                .await?
                .rows_affected();

                if affected == 0 {
                    return Err(StoreError::NotFound {
                        entity: "page view",
                        id: update.id.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    async fn summary(&self, business_id: Uuid) -> Result<AnalyticsSummary, StoreError> {
        let id = business_id.to_string();

        let (page_views, unique_visitors, avg_time_on_page_ms, avg_scroll_depth): (
            i64,
            i64,
            Option<f64>,
            Option<f64>,
        ) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(DISTINCT visitor_id), AVG(time_on_page_ms), AVG(scroll_depth)
            FROM page_views WHERE business_id = ?
            "#,
        )
        .bind(&id)
        .fetch_one(&self.pool)
        .await?;

        let (sessions,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions WHERE business_id = ?")
            .bind(&id)
            .fetch_one(&self.pool)
            .await?;

        Ok(AnalyticsSummary {
            page_views,
            unique_visitors,
            sessions,
            avg_time_on_page_ms,
            avg_scroll_depth,
        })
    }
}
