use thiserror::Error;

pub const MIN_SUBDOMAIN_LEN: usize = 3;
pub const MAX_SUBDOMAIN_LEN: usize = 63;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Subdomain must be at least 3 characters")]
    TooShort,

    #[error("Subdomain must be at most 63 characters")]
    TooLong,

    #[error("Subdomain may only contain lowercase letters, digits and hyphens (found '{0}')")]
    InvalidCharacter(char),

    #[error("Subdomain cannot start or end with a hyphen")]
    HyphenAtEdge,
}

/// Trims and lowercases user input, then checks it is a usable DNS label.
pub fn normalize_subdomain(input: &str) -> Result<String, DomainError> {
    let subdomain = input.trim().to_ascii_lowercase();
    let len = subdomain.chars().count();

    if len < MIN_SUBDOMAIN_LEN {
        return Err(DomainError::TooShort);
    }
    if len > MAX_SUBDOMAIN_LEN {
        return Err(DomainError::TooLong);
    }
    if let Some(bad) = subdomain
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(DomainError::InvalidCharacter(bad));
    }
    if subdomain.starts_with('-') || subdomain.ends_with('-') {
        return Err(DomainError::HyphenAtEdge);
    }

    Ok(subdomain)
}

pub fn site_url(subdomain: &str, root_domain: &str) -> String {
    let scheme = if root_domain.starts_with("localhost") {
        "http"
    } else {
        "https"
    };
    format!("{}://{}.{}", scheme, subdomain, root_domain)
}
