pub mod analytics;
pub mod site;

pub use self::analytics::AnalyticsService;
pub use self::site::{SiteError, SiteService};
