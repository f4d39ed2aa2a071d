//! Markdown sanitiser backed by [`ammonia`].
//!
//! Bodies are stored as markdown that may carry inline HTML. Only the tags a
//! markdown renderer emits survive; links are forced to open in a new tab
//! without an opener, and `data:` URLs are allowed on images only.

use std::{
  borrow::Cow,
  collections::{HashMap, HashSet},
  sync::LazyLock,
};

use ammonia::Builder;

const TAGS: &[&str] = &[
  "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "strong", "em", "u",
  "s", "code", "pre", "a", "img", "ul", "ol", "li", "blockquote", "table",
  "thead", "tbody", "tr", "th", "td",
];

static CLEANER: LazyLock<Builder<'static>> = LazyLock::new(|| {
  let attrs: HashMap<&str, HashSet<&str>> = [
    ("a", HashSet::from(["href", "title"])),
    ("img", HashSet::from(["src", "alt", "title", "width", "height"])),
    ("code", HashSet::from(["class"])),
    ("pre", HashSet::from(["class"])),
  ]
  .into_iter()
  .collect();

  let mut builder = Builder::default();
  builder
    .tags(TAGS.iter().copied().collect())
    .generic_attributes(HashSet::new())
    .tag_attributes(attrs)
    .url_schemes(HashSet::from(["http", "https", "mailto", "data"]))
    .link_rel(Some("noopener noreferrer"))
    .set_tag_attribute_value("a", "target", "_blank")
    .attribute_filter(|element, attribute, value| {
      let is_data = value.trim_start().to_ascii_lowercase().starts_with("data:");
      if is_data && !(element == "img" && attribute == "src") {
        None
      } else {
        Some(Cow::Borrowed(value))
      }
    });
  builder
});

/// Strip everything outside the allow-list from `raw`.
pub fn sanitize_markdown(raw: &str) -> String { CLEANER.clean(raw).to_string() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scripts_are_removed() {
    let out = sanitize_markdown("hello <script>alert(1)</script>world");
    assert_eq!(out, "hello world");
  }

  #[test]
  fn event_handlers_are_stripped() {
    let out = sanitize_markdown(r#"<p onclick="steal()">hi</p>"#);
    assert_eq!(out, "<p>hi</p>");
  }

  #[test]
  fn links_open_safely() {
    let out = sanitize_markdown(r#"<a href="https://example.com">x</a>"#);
    assert!(out.contains(r#"rel="noopener noreferrer""#));
    assert!(out.contains(r#"target="_blank""#));
    assert!(out.contains(r#"href="https://example.com""#));
  }

  #[test]
  fn javascript_urls_are_dropped() {
    let out = sanitize_markdown(r#"<a href="javascript:alert(1)">x</a>"#);
    assert!(!out.contains("javascript"));
  }

  #[test]
  fn data_urls_only_on_images() {
    let img = sanitize_markdown(r#"<img src="data:image/png;base64,AAAA">"#);
    assert!(img.contains("data:image/png"));
    let link = sanitize_markdown(r#"<a href="data:text/html,boom">x</a>"#);
    assert!(!link.contains("data:"));
  }

  #[test]
  fn plain_markdown_passes_through() {
    let md = "Use `Vec::new()` and **bold** text.";
    assert_eq!(sanitize_markdown(md), md);
  }
}
