use crate::domain::business::Business;
use crate::domain::content::{
    AboutData, ContactData, ContactFormData, ContactInfoData, ContentData, GalleryData,
    HeaderData, HeroData, MapData, PageContent, Review, ReviewsData, SectionData,
    SectionInstance,
};
use crate::parser::markdown::{compile_markdown_to_html, css_url, sanitize_url};
use crate::render::template::{escape_html, substitute, text};
use std::collections::HashMap;
use std::fmt::Write;

/// Everything a section needs besides its own payload.
pub struct RenderContext<'a> {
    pub business: &'a Business,
    pub vars: HashMap<String, String>,
}

impl<'a> RenderContext<'a> {
    pub fn new(business: &'a Business) -> Self {
        Self {
            business,
            vars: business.template_vars(),
        }
    }

    fn text(&self, raw: &str) -> String {
        text(raw, &self.vars)
    }

    fn url(&self, raw: &str) -> String {
        escape_html(&sanitize_url(&substitute(raw, &self.vars)))
    }

    fn css_url(&self, raw: &str) -> String {
        escape_html(&css_url(&substitute(raw, &self.vars)))
    }
}

/// Renders a complete HTML document for a page.
pub fn render_page(content: &PageContent, business: &Business) -> String {
    let ctx = RenderContext::new(business);
    let seo = &business.seo;

    let title = if !seo.seo_title.trim().is_empty() {
        ctx.text(&seo.seo_title)
    } else if !content.title.trim().is_empty() {
        ctx.text(&content.title)
    } else {
        escape_html(&business.name)
    };

    let mut head = String::new();
    let _ = write!(head, "<title>{}</title>", title);
    if !seo.seo_description.trim().is_empty() {
        let _ = write!(
            head,
            r#"<meta name="description" content="{}">"#,
            ctx.text(&seo.seo_description)
        );
    }
    let keywords = seo.keyword_list();
    if !keywords.is_empty() {
        let _ = write!(
            head,
            r#"<meta name="keywords" content="{}">"#,
            escape_html(&keywords.join(", "))
        );
    }
    if let Some(og_title) = &seo.og_title {
        let _ = write!(head, r#"<meta property="og:title" content="{}">"#, ctx.text(og_title));
    }
    if let Some(og_description) = &seo.og_description {
        let _ = write!(
            head,
            r#"<meta property="og:description" content="{}">"#,
            ctx.text(og_description)
        );
    }
    if let Some(og_image) = &seo.og_image {
        let _ = write!(head, r#"<meta property="og:image" content="{}">"#, ctx.url(og_image));
    }
    if let Some(favicon) = &seo.favicon {
        let _ = write!(head, r#"<link rel="icon" href="{}">"#, ctx.url(favicon));
    }

    let body: String = content
        .visible_sections()
        .map(|section| render_section(section, &ctx))
        .collect();

    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">{}\
         <style>{}</style></head><body>{}</body></html>",
        head,
        content.theme.css_variables(),
        body
    )
}

/// Renders one section. Hidden sections render nothing.
pub fn render_section(section: &SectionInstance, ctx: &RenderContext<'_>) -> String {
    if !section.visible {
        return String::new();
    }

    let inner = match &section.data {
        SectionData::Hero(data) => render_hero(data, ctx),
        SectionData::About(data) => render_about(data, ctx),
        SectionData::Gallery(data) => render_gallery(data, ctx),
        SectionData::Reviews(data) => render_reviews(data, ctx),
        SectionData::Contact(data) => render_contact(data, ctx),
        SectionData::Map(data) => render_map(data, ctx),
        SectionData::ContactForm(data) => render_contact_form(data, ctx),
        SectionData::Header(data) => render_header(data, ctx),
        SectionData::Content(data) => render_content(data, ctx),
        SectionData::ContactInfo(data) => render_contact_info(data, ctx),
    };

    let tag = match section.data {
        SectionData::Header(_) => "header",
        _ => "section",
    };

    format!(
        r#"<{tag} id="section-{id}" class="section section-{category} {variation}">{inner}</{tag}>"#,
        tag = tag,
        id = escape_html(&section.id),
        category = section.category(),
        variation = escape_html(&section.variation_id),
        inner = inner,
    )
}

fn heading(level: u8, raw: &str, ctx: &RenderContext<'_>) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    format!("<h{l}>{}</h{l}>", ctx.text(raw), l = level)
}

fn render_hero(data: &HeroData, ctx: &RenderContext<'_>) -> String {
    let mut out = String::new();
    if let Some(image) = &data.background_image {
        let _ = write!(
            out,
            r#"<div class="hero-background" style="background-image: url('{}')"></div>"#,
            ctx.css_url(image)
        );
    }
    out.push_str(&heading(1, &data.headline, ctx));
    if !data.subheadline.is_empty() {
        let _ = write!(out, "<p class=\"hero-subheadline\">{}</p>", ctx.text(&data.subheadline));
    }
    if !data.cta_text.is_empty() {
        let _ = write!(
            out,
            r#"<a class="button button-primary" href="{}">{}</a>"#,
            ctx.url(&data.cta_link),
            ctx.text(&data.cta_text)
        );
    }
    out
}

fn render_about(data: &AboutData, ctx: &RenderContext<'_>) -> String {
    let mut out = heading(2, &data.heading, ctx);
    for paragraph in data.body.split("\n\n").filter(|p| !p.trim().is_empty()) {
        let _ = write!(out, "<p>{}</p>", ctx.text(paragraph.trim()));
    }
    if let Some(image) = &data.image {
        let _ = write!(out, r#"<img src="{}" alt="">"#, ctx.url(image));
    }
    out
}

fn render_gallery(data: &GalleryData, ctx: &RenderContext<'_>) -> String {
    let mut out = heading(2, &data.heading, ctx);
    out.push_str(r#"<div class="gallery">"#);

    // an empty gallery shows the business photos from its listing
    let fallback: Vec<(String, Option<String>)>;
    let images: Vec<(&str, Option<&str>)> = if data.images.is_empty() {
        fallback = ctx
            .business
            .photos
            .iter()
            .map(|url| (url.clone(), None))
            .collect();
        fallback.iter().map(|(u, c)| (u.as_str(), c.as_deref())).collect()
    } else {
        data.images
            .iter()
            .map(|i| (i.url.as_str(), i.caption.as_deref()))
            .collect()
    };

    for (url, caption) in images {
        let caption = caption.map(|c| ctx.text(c)).unwrap_or_default();
        let _ = write!(
            out,
            r#"<figure><img src="{}" alt="{}" loading="lazy">"#,
            ctx.url(url),
            caption
        );
        if !caption.is_empty() {
            let _ = write!(out, "<figcaption>{}</figcaption>", caption);
        }
        out.push_str("</figure>");
    }
    out.push_str("</div>");
    out
}

fn stars(rating: u8) -> String {
    let rating = rating.min(5) as usize;
    format!("{}{}", "★".repeat(rating), "☆".repeat(5 - rating))
}

fn render_reviews(data: &ReviewsData, ctx: &RenderContext<'_>) -> String {
    let mut out = heading(2, &data.heading, ctx);
    if data.show_rating {
        if let Some(rating) = ctx.business.rating {
            let _ = write!(
                out,
                r#"<p class="rating-summary">{:.1} / 5 ({} reviews)</p>"#,
                rating, ctx.business.review_count
            );
        }
    }

    let reviews: &[Review] = if data.reviews.is_empty() {
        &ctx.business.reviews
    } else {
        &data.reviews
    };

    out.push_str(r#"<div class="reviews">"#);
    for review in reviews {
        let _ = write!(
            out,
            r#"<blockquote class="review"><span class="stars">{}</span><p>{}</p><cite>{}</cite></blockquote>"#,
            stars(review.rating),
            ctx.text(&review.text),
            ctx.text(&review.author)
        );
    }
    out.push_str("</div>");
    out
}

fn render_contact(data: &ContactData, ctx: &RenderContext<'_>) -> String {
    let mut out = heading(2, &data.heading, ctx);
    out.push_str("<ul class=\"contact\">");
    if !data.phone.is_empty() {
        let phone = substitute(&data.phone, &ctx.vars);
        let _ = write!(
            out,
            r#"<li><a href="tel:{}">{}</a></li>"#,
            escape_html(&phone.replace(' ', "")),
            escape_html(&phone)
        );
    }
    if !data.email.is_empty() {
        let email = ctx.text(&data.email);
        let _ = write!(out, r#"<li><a href="mailto:{0}">{0}</a></li>"#, email);
    }
    if !data.address.is_empty() {
        let _ = write!(out, "<li>{}</li>", ctx.text(&data.address));
    }
    out.push_str("</ul>");

    if data.show_hours && !ctx.business.hours.is_empty() {
        out.push_str("<table class=\"hours\">");
        for hours in &ctx.business.hours {
            let _ = write!(
                out,
                "<tr><th>{}</th><td>{} - {}</td></tr>",
                escape_html(&hours.day),
                escape_html(&hours.open),
                escape_html(&hours.close)
            );
        }
        out.push_str("</table>");
    }
    out
}

fn render_map(data: &MapData, ctx: &RenderContext<'_>) -> String {
    let mut out = heading(2, &data.heading, ctx);
    let address = substitute(&data.address, &ctx.vars);
    if address.trim().is_empty() {
        return out;
    }

    let zoom = if data.zoom == 0 { 15 } else { data.zoom.min(21) };
    let zoom = zoom.to_string();
    let src = reqwest::Url::parse_with_params(
        "https://maps.google.com/maps",
        &[("q", address.as_str()), ("z", zoom.as_str()), ("output", "embed")],
    )
    .map(|u| u.to_string())
    .unwrap_or_default();

    let _ = write!(
        out,
        r#"<iframe class="map" src="{}" loading="lazy" title="{}"></iframe>"#,
        escape_html(&src),
        escape_html(&address)
    );
    out
}

fn render_contact_form(data: &ContactFormData, ctx: &RenderContext<'_>) -> String {
    let mut out = heading(2, &data.heading, ctx);
    out.push_str(r#"<form class="contact-form" method="post">"#);
    for field in &data.fields {
        let name = escape_html(&field.name);
        let label = ctx.text(&field.label);
        let required = if field.required { " required" } else { "" };
        if field.kind == "textarea" {
            let _ = write!(
                out,
                r#"<label>{label}<textarea name="{name}"{required}></textarea></label>"#
            );
        } else {
            let kind = if field.kind.is_empty() {
                "text".to_string()
            } else {
                escape_html(&field.kind)
            };
            let _ = write!(
                out,
                r#"<label>{label}<input type="{kind}" name="{name}"{required}></label>"#
            );
        }
    }
    let submit = if data.submit_label.is_empty() {
        "Send".to_string()
    } else {
        ctx.text(&data.submit_label)
    };
    let _ = write!(out, r#"<button type="submit">{}</button></form>"#, submit);
    out
}

fn render_header(data: &HeaderData, ctx: &RenderContext<'_>) -> String {
    let mut out = String::new();
    if let Some(logo) = &data.logo {
        let _ = write!(out, r#"<img class="logo" src="{}" alt="">"#, ctx.url(logo));
    }
    let name = if data.business_name.is_empty() {
        escape_html(&ctx.business.name)
    } else {
        ctx.text(&data.business_name)
    };
    let _ = write!(out, r#"<span class="brand">{}</span>"#, name);
    if !data.links.is_empty() {
        out.push_str("<nav>");
        for link in &data.links {
            let _ = write!(
                out,
                r#"<a href="{}">{}</a>"#,
                ctx.url(&link.href),
                ctx.text(&link.label)
            );
        }
        out.push_str("</nav>");
    }
    out
}

fn render_content(data: &ContentData, ctx: &RenderContext<'_>) -> String {
    let mut out = heading(2, &data.heading, ctx);
    let markdown = substitute(&data.markdown, &ctx.vars);
    out.push_str(&compile_markdown_to_html(&markdown, sanitize_url));
    out
}

fn render_contact_info(data: &ContactInfoData, ctx: &RenderContext<'_>) -> String {
    let mut out = heading(2, &data.heading, ctx);
    out.push_str(r#"<dl class="contact-info">"#);
    for item in &data.items {
        let _ = write!(
            out,
            "<dt>{}</dt><dd>{}</dd>",
            ctx.text(&item.label),
            ctx.text(&item.value)
        );
    }
    out.push_str("</dl>");
    out
}
