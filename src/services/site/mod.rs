pub mod cache;
pub mod manifest;
pub mod site;

pub use self::cache::{RenderedSite, SiteCache};
pub use self::manifest::SiteManifest;
pub use self::site::{LoadedPage, SiteError, SiteService};
