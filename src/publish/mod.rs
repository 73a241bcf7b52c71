pub mod domain;
pub mod state;

pub use domain::{normalize_subdomain, site_url, DomainError};
pub use state::{PublishAction, PublishError, PublishOutcome, PublishState, Publisher};
