pub mod business;
pub mod content;
pub mod theme;
pub mod variation;

pub use business::{Business, OpeningHours, SeoSettings};
pub use content::{PageContent, SectionData, SectionInstance};
pub use theme::Theme;
pub use variation::SectionCategory;
