//! SEO score heuristic for the publish settings form.
//!
//! The score is a pure function of the form and is never stored.

use crate::domain::SeoSettings;
use serde::Serialize;

pub const TITLE_RANGE: (usize, usize) = (30, 60);
pub const DESCRIPTION_RANGE: (usize, usize) = (120, 160);
pub const KEYWORD_RANGE: (usize, usize) = (3, 10);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoReport {
    pub score: u8,
    pub issues: Vec<String>,
}

fn in_range(n: usize, (min, max): (usize, usize)) -> bool {
    n >= min && n <= max
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map_or(false, |v| !v.trim().is_empty())
}

pub fn evaluate(seo: &SeoSettings) -> SeoReport {
    let mut score: u32 = 0;
    let mut issues = Vec::new();

    let title_len = seo.seo_title.trim().chars().count();
    if in_range(title_len, TITLE_RANGE) {
        score += 20;
    } else {
        if title_len > 0 {
            score += 10;
        }
        issues.push(format!(
            "Title should be {}-{} characters (currently {})",
            TITLE_RANGE.0, TITLE_RANGE.1, title_len
        ));
    }

    let description_len = seo.seo_description.trim().chars().count();
    if in_range(description_len, DESCRIPTION_RANGE) {
        score += 20;
    } else {
        if description_len > 0 {
            score += 10;
        }
        issues.push(format!(
            "Description should be {}-{} characters (currently {})",
            DESCRIPTION_RANGE.0, DESCRIPTION_RANGE.1, description_len
        ));
    }

    let keyword_count = seo.keyword_list().len();
    if in_range(keyword_count, KEYWORD_RANGE) {
        score += 15;
    } else {
        if keyword_count > 0 {
            score += 5;
        }
        issues.push(format!(
            "Use {}-{} keywords (currently {})",
            KEYWORD_RANGE.0, KEYWORD_RANGE.1, keyword_count
        ));
    }

    let presence = [
        (&seo.og_title, 10, "Add an Open Graph title"),
        (&seo.og_description, 10, "Add an Open Graph description"),
        (&seo.og_image, 15, "Add an Open Graph image"),
        (&seo.favicon, 10, "Add a favicon"),
    ];
    for (value, points, hint) in presence {
        if present(value) {
            score += points;
        } else {
            issues.push(hint.to_string());
        }
    }

    SeoReport {
        score: score.min(100) as u8,
        issues,
    }
}

pub fn score(seo: &SeoSettings) -> u8 {
    evaluate(seo).score
}
