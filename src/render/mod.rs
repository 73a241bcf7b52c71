pub mod html;
pub mod template;

pub use html::{render_page, render_section, RenderContext};
