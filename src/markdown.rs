//! Product Description Markdown
//!
//! pulldown-cmark with a small event transform:
//! - Raw HTML in the source is shown as text, never injected
//! - Images are constrained to the description column
//! - Links open in a new tab

use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Render markdown to HTML safe for `inner_html`
pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, get_options());
    let events = transform_events(parser);
    let mut html_output = String::new();
    push_html(&mut html_output, events.into_iter());
    html_output
}

/// Render for inline use (strips outer <p> tags)
pub fn render_markdown_inline(text: &str) -> String {
    let html = render_markdown(text);

    html.trim()
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .map(|s| s.to_string())
        .unwrap_or(html)
}

fn get_options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES
}

enum State {
    Normal,
    /// Inside an image; alt text events are dropped
    InImage { dropped_depth: usize },
}

fn transform_events<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut state = State::Normal;

    for event in parser {
        match state {
            State::Normal => match event {
                Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),

                Event::Start(Tag::Image { dest_url, .. }) => {
                    let html = if is_safe_url(&dest_url) {
                        format!(
                            r#"<img src="{}" class="description-image" loading="lazy" />"#,
                            escape_html(&dest_url)
                        )
                    } else {
                        String::new()
                    };
                    events.push(Event::Html(CowStr::from(html)));
                    state = State::InImage { dropped_depth: 0 };
                }

                Event::Start(Tag::Link { dest_url, .. }) => {
                    let href = if is_safe_url(&dest_url) { escape_html(&dest_url) } else { "#".to_string() };
                    let html = format!(r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#, href);
                    events.push(Event::Html(CowStr::from(html)));
                }
                Event::End(TagEnd::Link) => events.push(Event::Html(CowStr::from("</a>"))),

                other => events.push(other),
            },

            State::InImage { ref mut dropped_depth } => match event {
                Event::Start(_) => *dropped_depth += 1,
                Event::End(_) => {
                    if *dropped_depth == 0 {
                        state = State::Normal;
                    } else {
                        *dropped_depth -= 1;
                    }
                }
                _ => {}
            },
        }
    }

    events
}

/// Only web links and relative paths; no `javascript:` and friends
fn is_safe_url(url: &str) -> bool {
    let lower = url.trim().to_lowercase();
    match lower.split_once(':') {
        Some((scheme, _)) if !scheme.contains('/') => matches!(scheme, "http" | "https" | "mailto"),
        _ => true,
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_formatting() {
        let html = render_markdown("**Soft** wool, _hand_ knitted");
        assert!(html.contains("<strong>Soft</strong>"));
        assert!(html.contains("<em>hand</em>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("Nice <script>alert(1)</script> scarf\n\n<div onclick=\"x\">block</div>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<div"));
    }

    #[test]
    fn test_images_drop_alt_text() {
        let html = render_markdown("![front view](https://cdn.example.com/a.jpg)");
        assert!(html.contains(r#"<img src="https://cdn.example.com/a.jpg" class="description-image""#));
        assert!(!html.contains("front view"));
    }

    #[test]
    fn test_unsafe_links_neutralised() {
        let html = render_markdown("[click](javascript:alert(1)) and [shop](https://shop.example.com)");
        assert!(!html.contains("javascript:"));
        assert!(html.contains(r##"<a href="#""##));
        assert!(html.contains(r#"href="https://shop.example.com" target="_blank""#));
    }

    #[test]
    fn test_inline_strips_paragraph() {
        assert_eq!(render_markdown_inline("plain *text*"), "plain <em>text</em>");
    }
}
