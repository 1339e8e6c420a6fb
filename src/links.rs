//! Relative link resolution and rewriting
//!
//! Report pages link to each other with relative hrefs such as
//! `../index.html` or `utils/math.ts.html`. Inside the bundle every page lives
//! in the same document, so those links are turned into `#<page id>` anchors.
//! The browser runtime repeats [`resolve_link`] at click time for anything the
//! static pass could not match.

use crate::page::Page;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const ABSOLUTE_PREFIXES: [&str; 3] = ["http://", "https://", "//"];

fn html_href_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"href="([^"]*\.html)""#).expect("valid href regex"))
}

/// Relative page path -> page identifier, ordered by path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathIndex(BTreeMap<String, String>);

impl PathIndex {
    pub fn from_pages(pages: &[Page]) -> Self {
        Self(
            pages
                .iter()
                .map(|p| (p.path().to_string(), p.id().to_string()))
                .collect(),
        )
    }

    /// Identifier of the page at `path`
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON object for embedding inside a `<script>` block
    pub fn to_script_json(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        escape_json_for_script(&json)
    }
}

/// Keeps a serialized payload from closing its `<script>` element early
pub fn escape_json_for_script(s: &str) -> String {
    s.replace("</script>", "<\\/script>")
}

/// Whether `target` points off-document (network scheme or protocol-relative)
pub fn is_absolute_url(target: &str) -> bool {
    let lower = target.trim_start().to_ascii_lowercase();
    ABSOLUTE_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Resolve `target` against the directory containing `current_page`.
///
/// `..` pops one directory (never above the root), `.` and empty segments
/// are dropped, everything else is appended.
pub fn resolve_link(current_page: &str, target: &str) -> String {
    let current_page = current_page.replace('\\', "/");
    let mut stack: Vec<&str> = current_page.split('/').filter(|s| !s.is_empty()).collect();
    // last segment is the page itself
    stack.pop();

    let target = target.replace('\\', "/");
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            s => stack.push(s),
        }
    }
    normalize_path(&stack.join("/"))
}

/// Forward slashes only, no duplicate slashes, no leading slash
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' && (out.is_empty() || out.ends_with('/')) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Rewrite every `href="….html"` in `body` that resolves to a bundled page
/// into `href="#<id>"`. Unresolved and absolute targets are left as they are.
pub fn rewrite_links(body: &str, current_page: &str, index: &PathIndex) -> String {
    html_href_re()
        .replace_all(body, |caps: &regex::Captures| {
            let target = &caps[1];
            if is_absolute_url(target) {
                return caps[0].to_string();
            }
            match index.get(&resolve_link(current_page, target)) {
                Some(id) => format!("href=\"#{id}\""),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
