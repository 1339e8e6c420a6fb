//! Coverage pages and the markup extracted from them

use crate::assets::SCRIPTS;
use regex::Regex;
use std::sync::OnceLock;

/// Title used when a page (or the bundle) has none
pub const DEFAULT_TITLE: &str = "Coverage Report";

/// Relative path of the root page
pub const INDEX_PAGE: &str = "index.html";

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"))
}

fn body_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<body[^>]*>(.*)</body>").expect("valid body regex"))
}

fn script_src_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<script\b[^>]*\bsrc="([^"]*)"[^>]*>\s*</script>\s*"#)
            .expect("valid script regex")
    })
}

/// A single HTML page of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    path: String,
    id: String,
    title: String,
    body: String,
}

impl Page {
    /// Build a page from its path relative to the report root and its markup
    pub fn new(path: impl Into<String>, markup: &str) -> Self {
        let path = path.into();
        Self {
            id: page_id(&path),
            title: extract_title(markup),
            body: strip_bundled_scripts(extract_body(markup)),
            path,
        }
    }

    /// Relative path with `/` separators, e.g. `src/utils/index.html`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// In-document identifier derived from the path
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_index(&self) -> bool {
        self.path == INDEX_PAGE
    }

    pub(crate) fn set_body(&mut self, body: String) {
        self.body = body;
    }
}

/// Identifier for a relative path: every non-alphanumeric ASCII character
/// becomes `_`.
pub fn page_id(path: &str) -> String {
    path.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Text of the `<title>` element, or [`DEFAULT_TITLE`]
pub fn extract_title(markup: &str) -> String {
    title_re()
        .captures(markup)
        .map(|c| c[1].trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Markup between the body tags, or the whole document without a body
pub fn extract_body(markup: &str) -> &str {
    body_re()
        .captures(markup)
        .and_then(|c| c.get(1))
        .map_or(markup, |m| m.as_str())
}

/// Drop `<script src>` tags that load one of the shared scripts. Those are
/// inlined once for the whole bundle.
fn strip_bundled_scripts(body: &str) -> String {
    script_src_re()
        .replace_all(body, |caps: &regex::Captures| {
            let src = &caps[1];
            let name = src.rsplit('/').next().unwrap_or(src);
            if !crate::links::is_absolute_url(src) && SCRIPTS.contains(&name) {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_replaces_non_alphanumeric() {
        assert_eq!(page_id("src/utils/index.html"), "src_utils_index_html");
        assert_eq!(page_id("a-b/c.d.ts.html"), "a_b_c_d_ts_html");
        assert_eq!(page_id("index.html"), "index_html");
    }

    #[test]
    fn test_extract_title() {
        let html = "<html><head><title>\n  Code coverage report for src  \n</title></head></html>";
        assert_eq!(extract_title(html), "Code coverage report for src");
    }

    #[test]
    fn test_extract_title_missing_or_empty() {
        assert_eq!(extract_title("<html><body></body></html>"), DEFAULT_TITLE);
        assert_eq!(extract_title("<title>   </title>"), DEFAULT_TITLE);
    }

    #[test]
    fn test_extract_body() {
        let html = r#"<html><head></head><BODY class="x">
<div>hi</div>
</BODY></html>"#;
        assert_eq!(extract_body(html), "\n<div>hi</div>\n");
    }

    #[test]
    fn test_extract_body_falls_back_to_document() {
        let html = "<div>fragment</div>";
        assert_eq!(extract_body(html), html);
    }

    #[test]
    fn test_new_strips_bundled_scripts_only() {
        let html = r#"<body><p>x</p>
<script src="../prettify.js"></script>
<script>window.onload = function () { prettyPrint(); };</script>
<script src="sorter.js"></script>
<script src="vendor/other.js"></script>
<script src="https://cdn.example.com/sorter.js"></script>
</body>"#;
        let page = Page::new("src/a.ts.html", html);
        assert!(!page.body().contains("prettify.js"));
        assert!(!page.body().contains(r#"src="sorter.js""#));
        assert!(page.body().contains("prettyPrint()"));
        assert!(page.body().contains("vendor/other.js"));
        assert!(page.body().contains("https://cdn.example.com/sorter.js"));
    }

    #[test]
    fn test_is_index() {
        assert!(Page::new("index.html", "").is_index());
        assert!(!Page::new("src/index.html", "").is_index());
    }
}
