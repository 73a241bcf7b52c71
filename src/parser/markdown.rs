use pulldown_cmark::{html, Event, Options as CmarkOptions, Parser, Tag};
use reqwest::Url;

// compiles a content section's markdown into HTML. link and image destinations go through the resolver;
// raw HTML in the source is emitted as text so user content cannot inject markup.
pub fn compile_markdown_to_html<F>(markdown_content: &str, mut resolver: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut options = CmarkOptions::empty();
    options.insert(CmarkOptions::ENABLE_STRIKETHROUGH);
    options.insert(CmarkOptions::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown_content, options);

    let mut html_content = String::new();

    let event_iterator = parser.map(|event| match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let new_url = resolver(&dest_url);
            Event::Start(Tag::Link {
                link_type,
                dest_url: new_url.into(),
                title,
                id,
            })
        }
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let new_url = resolver(&dest_url);
            Event::Start(Tag::Image {
                link_type,
                dest_url: new_url.into(),
                title,
                id,
            })
        }
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    html::push_html(&mut html_content, event_iterator);

    html_content
}

const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

/// Keeps relative links and http(s), mailto and tel urls; anything else becomes `#`.
/// Tabs, newlines and leading control characters are stripped before the scheme check.
pub fn sanitize_url(url: &str) -> String {
    let cleaned: String = url
        .trim_start_matches(|c: char| c <= ' ')
        .trim_end()
        .chars()
        .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
        .collect();

    if cleaned.starts_with(['#', '/', '?', '.']) {
        return cleaned;
    }

    // no colon before the path means no scheme: a relative link like `menu.html`
    let head = cleaned.split(['/', '?', '#']).next().unwrap_or_default();
    if !head.contains(':') {
        return cleaned;
    }

    match Url::parse(&cleaned) {
        Ok(parsed) if ALLOWED_SCHEMES.contains(&parsed.scheme()) => cleaned,
        _ => "#".to_string(),
    }
}

/// A sanitized url that is safe inside a quoted CSS `url('...')`.
pub fn css_url(url: &str) -> String {
    let mut out = String::new();
    for c in sanitize_url(url).chars() {
        match c {
            '\'' | '"' | '(' | ')' | '\\' | ' ' => {
                out.push_str(&format!("%{:02X}", c as u32));
            }
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}
