use crate::parser::markdown::{compile_markdown_to_html, css_url, sanitize_url};

#[test]
fn test_compile_markdown_basic() {
    let html = compile_markdown_to_html("# Opening hours\n\nWe are **open** daily.", sanitize_url);
    assert!(html.contains("<h1>Opening hours</h1>"));
    assert!(html.contains("<strong>open</strong>"));
}

#[test]
fn test_links_go_through_resolver() {
    let html = compile_markdown_to_html("[menu](/menu) and [site](https://example.com)", |url| {
        format!("{}?ref=site", url)
    });
    assert!(html.contains(r#"href="/menu?ref=site""#));
    assert!(html.contains(r#"href="https://example.com?ref=site""#));
}

#[test]
fn test_script_links_are_neutralised() {
    let html = compile_markdown_to_html(
        "[click](javascript:alert(1)) ![x](data:text/html;base64,AAAA)",
        sanitize_url,
    );
    assert!(!html.contains("javascript:"));
    assert!(!html.contains("data:"));
    assert!(html.contains(r##"href="#""##));
}

#[test]
fn test_raw_html_is_escaped() {
    let html = compile_markdown_to_html("Hello <script>alert(1)</script>\n\n<div>block</div>", sanitize_url);
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<div>"));
}

#[test]
fn test_sanitize_url() {
    assert_eq!(sanitize_url(" JavaScript:alert(1)"), "#");
    assert_eq!(sanitize_url("vbscript:msgbox"), "#");
    assert_eq!(sanitize_url(" https://example.com/a "), "https://example.com/a");
    assert_eq!(sanitize_url("tel:+15551234"), "tel:+15551234");
}

#[test]
fn test_sanitize_url_ignores_whitespace_inside_scheme() {
    assert_eq!(sanitize_url("java\tscript:alert(1)"), "#");
    assert_eq!(sanitize_url("java\r\nscript:alert(1)"), "#");
    assert_eq!(sanitize_url("\u{1}\u{0}javascript:alert(1)"), "#");
    assert_eq!(sanitize_url("https://exa\tmple.com/"), "https://example.com/");
}

#[test]
fn test_sanitize_url_allows_known_schemes_and_relative_links() {
    assert_eq!(sanitize_url("mailto:hi@rosa.example"), "mailto:hi@rosa.example");
    assert_eq!(sanitize_url("#contact"), "#contact");
    assert_eq!(sanitize_url("/menu"), "/menu");
    assert_eq!(sanitize_url("menu.html?day=mon"), "menu.html?day=mon");
    assert_eq!(sanitize_url("ftp://files.example.com"), "#");
    assert_eq!(sanitize_url("blob:https://example.com/x"), "#");
}

#[test]
fn test_css_url_cannot_close_the_url_function() {
    assert_eq!(
        css_url("https://img.example.com/a.jpg') ; color: red; ('"),
        "https://img.example.com/a.jpg%27%29%20;%20color:%20red;%20%28%27"
    );
    assert_eq!(css_url("https://img.example.com/a\\b.jpg"), "https://img.example.com/a%5Cb.jpg");
    assert_eq!(css_url("javascript:alert(1)"), "#");
}
