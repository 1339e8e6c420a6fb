//! Edge case tests: degenerate report markup must not panic or fail.

use coverage_bundler::{bundle_collected, Collected, RawPage};
use coverage_bundler::assets::AssetSet;

fn bundle_pages(pages: Vec<RawPage>) -> coverage_bundler::BundleResult {
    let collected = Collected::new("report", pages, AssetSet::new()).unwrap();
    bundle_collected(&collected, None).unwrap()
}

#[test]
fn empty_pages_no_panic() {
    let result = bundle_pages(vec![RawPage::new("index.html", "")]);
    assert_eq!(result.file_count, 1);
    assert!(result.html.contains("data-title=\"Coverage Report\""));
}

#[test]
fn missing_body_uses_whole_document() {
    let result = bundle_pages(vec![RawPage::new(
        "index.html",
        "<div class=\"fragment\">no body tag</div>",
    )]);
    assert!(result.html.contains("<div class=\"fragment\">no body tag</div>"));
}

#[test]
fn unclosed_markup_is_copied_verbatim() {
    let result = bundle_pages(vec![RawPage::new("index.html", "<body><table><tr><td>open")]);
    assert!(result.html.contains("<body><table><tr><td>open"));
}

#[test]
fn page_title_escaped_in_attributes() {
    let result = bundle_pages(vec![RawPage::new(
        "index.html",
        r#"<title>Report for "a" & <b></title>"#,
    )]);
    assert!(result
        .html
        .contains("data-title=\"Report for &quot;a&quot; &amp; &lt;b&gt;\""));
}

#[test]
fn link_above_root_resolves_to_root() {
    let result = bundle_pages(vec![
        RawPage::new("index.html", ""),
        RawPage::new("a/page.html", r#"<body><a href="../../../index.html">up</a></body>"#),
    ]);
    assert!(result.html.contains(r##"<a href="#index_html">up</a>"##));
}

#[test]
fn unicode_paths_get_ascii_ids() {
    let result = bundle_pages(vec![
        RawPage::new("index.html", r#"<body><a href="données/é.ts.html">x</a></body>"#),
        RawPage::new("données/é.ts.html", ""),
    ]);
    assert!(result.html.contains(r##"<a href="#donn_es___ts_html">x</a>"##));
}

#[test]
fn script_close_tag_in_paths_cannot_break_out() {
    let result = bundle_pages(vec![
        RawPage::new("index.html", ""),
        RawPage::new("</script>.html", ""),
    ]);
    assert!(result.html.contains("<\\/script>.html"));
}

#[test]
fn deeply_nested_pages() {
    let mut pages = vec![RawPage::new("index.html", "")];
    let mut path = String::new();
    for i in 0..20 {
        path.push_str(&format!("d{}/", i));
    }
    path.push_str("leaf.ts.html");
    pages.push(RawPage::new(path.clone(), ""));

    let result = bundle_pages(pages);
    assert_eq!(result.file_count, 2);
    assert_eq!(result.html.matches("<li class=\"bundle-folder\">").count(), 20);
}
