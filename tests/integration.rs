//! Integration tests: full bundle pipeline against generated report directories

use coverage_bundler::{bundle, BundleError, BundleOptions};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A report shaped like Istanbul's html reporter output
fn istanbul_report(root: &Path) {
    write(
        root,
        "index.html",
        br#"<!doctype html>
<html lang="en">
<head>
    <title>Code coverage report for All files</title>
    <link rel="stylesheet" href="prettify.css" />
    <link rel="stylesheet" href="base.css" />
    <link rel="shortcut icon" type="image/x-icon" href="favicon.png" />
</head>
<body>
<div class='wrapper'>
    <h1>All files</h1>
    <table class="coverage-summary">
    <tbody><tr>
        <td class="file high" data-value="src"><a href="src/index.html">src</a></td>
    </tr></tbody>
    </table>
</div>
<div class='footer quiet pad2 space-top1 center small'>
    Code coverage generated by
    <a href="https://istanbul.js.org/" target="_blank" rel="noopener noreferrer">istanbul</a>
</div>
<script src="prettify.js"></script>
<script>
window.onload = function () {
    prettyPrint();
};
</script>
<script src="sorter.js"></script>
<script src="block-navigation.js"></script>
</body>
</html>
"#,
    );
    write(
        root,
        "src/index.html",
        br#"<html><head><title>Code coverage report for src</title></head><body>
<div class="pad1"><h1><a href="../index.html">All files</a> src</h1></div>
<table><tr><td class="file low"><a href="math.ts.html">math.ts</a></td></tr>
<tr><td class="file low"><a href="utils/format.ts.html">utils/format.ts</a></td></tr></table>
<script src="../sorter.js"></script>
</body></html>"#,
    );
    write(
        root,
        "src/math.ts.html",
        br#"<html><head><title>Code coverage report for src/math.ts</title></head><body>
<h1><a href="../index.html">All files</a> / <a href="index.html">src</a> math.ts</h1>
<pre class="prettyprint lang-js"><a name='L1'></a><a href='#L1'>1</a></pre>
</body></html>"#,
    );
    write(
        root,
        "src/utils/format.ts.html",
        br#"<html><head><title>format.ts</title></head><body>
<h1><a href="../../index.html">All files</a> / <a href="../index.html">src</a> / <a href="./format.ts.html">format.ts</a></h1>
<a href="https://istanbul.js.org/index.html">docs</a>
</body></html>"#,
    );
    write(root, "base.css", b".coverage-summary{border-collapse:collapse}\n.sorter{background-image:url(sort-arrow-sprite.png)}");
    write(root, "prettify.css", b".pln{color:#000}");
    write(root, "prettify.js", b"window.PR_SHOULD_USE_CONTINUATION=true;");
    write(root, "sorter.js", b"var addSorting=(function(){})();");
    write(root, "block-navigation.js", b"var jumpToCode=(function init(){})();");
    write(root, "favicon.png", &[0x89, b'P', b'N', b'G']);
    write(root, "sort-arrow-sprite.png", &[1, 2, 3]);
}

#[test]
fn end_to_end_minimal_report() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "index.html", br#"<html><body><a href="file.html">file</a></body></html>"#);
    write(dir.path(), "file.html", b"<html><body>file page</body></html>");
    write(dir.path(), "base.css", b".wrapper{min-height:100%}");
    write(dir.path(), "favicon.png", &[0x89, b'P', b'N', b'G']);

    let result = bundle(&BundleOptions::new(dir.path())).unwrap();

    assert_eq!(result.file_count, 2);
    assert_eq!(result.total_size, result.html.len());
    assert_eq!(result.html.matches("<section class=\"bundle-page").count(), 2);
    let style = &result.html[result.html.find("<style>").unwrap()..result.html.find("</style>").unwrap()];
    assert!(style.contains(".wrapper{min-height:100%}"));
    assert!(result.html.contains("data:image/png;base64,iVBORw=="));
    assert!(result.html.contains(r##"<a href="#file_html">file</a>"##));
}

#[test]
fn istanbul_report_links_are_rewritten() {
    let dir = TempDir::new().unwrap();
    istanbul_report(dir.path());

    let result = bundle(&BundleOptions::new(dir.path())).unwrap();
    let html = &result.html;

    assert_eq!(result.file_count, 4);
    assert!(html.contains(r##"<a href="#src_index_html">src</a>"##));
    assert!(html.contains(r##"<a href="#index_html">All files</a>"##));
    assert!(html.contains(r##"<a href="#src_math_ts_html">math.ts</a>"##));
    assert!(html.contains(r##"<a href="#src_utils_format_ts_html">utils/format.ts</a>"##));
    assert!(html.contains(r##"<a href="#src_utils_format_ts_html">format.ts</a>"##));
    // external and line anchors untouched
    assert!(html.contains(r#"<a href="https://istanbul.js.org/index.html">docs</a>"#));
    assert!(html.contains(r##"<a href='#L1'>1</a>"##));
}

#[test]
fn istanbul_report_assets_are_inlined_once() {
    let dir = TempDir::new().unwrap();
    istanbul_report(dir.path());

    let html = bundle(&BundleOptions::new(dir.path())).unwrap().html;

    assert!(!html.contains("<script src="));
    assert_eq!(html.matches("var addSorting=").count(), 1);
    assert!(html.contains("window.PR_SHOULD_USE_CONTINUATION=true;"));
    assert!(html.contains("var jumpToCode="));
    assert!(html.contains("url(data:image/png;base64,AQID)"));
    assert!(html.contains(".pln{color:#000}"));
    // the per-page inline onload script is page markup and stays
    assert!(html.contains("prettyPrint();"));
}

#[test]
fn only_index_page_starts_visible() {
    let dir = TempDir::new().unwrap();
    istanbul_report(dir.path());

    let html = bundle(&BundleOptions::new(dir.path())).unwrap().html;
    assert_eq!(html.matches("class=\"bundle-page active\"").count(), 1);
    assert!(html.contains("<section class=\"bundle-page active\" id=\"index_html\""));
}

#[test]
fn sidebar_tree_is_ordered() {
    let dir = TempDir::new().unwrap();
    istanbul_report(dir.path());

    let html = bundle(&BundleOptions::new(dir.path())).unwrap().html;
    let nav = &html[html.find("<nav").unwrap()..html.find("</nav>").unwrap()];
    let src = nav.find(">src</button>").unwrap();
    let utils = nav.find(">utils</button>").unwrap();
    let math = nav.find(">math.ts</a>").unwrap();
    let root_index = nav.rfind(">index</a>").unwrap();
    assert!(src < utils && utils < math);
    assert!(math < root_index);
}

#[test]
fn rerun_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    istanbul_report(dir.path());

    let first = bundle(&BundleOptions::new(dir.path())).unwrap();
    let second = bundle(&BundleOptions::new(dir.path())).unwrap();
    assert_eq!(first.html, second.html);
}

#[test]
fn lcov_report_copy_is_not_counted() {
    let dir = TempDir::new().unwrap();
    istanbul_report(dir.path());
    write(dir.path(), "lcov-report/index.html", b"<body>duplicate</body>");
    write(dir.path(), "lcov-report/src/math.ts.html", b"<body>duplicate</body>");

    let result = bundle(&BundleOptions::new(dir.path())).unwrap();
    assert_eq!(result.file_count, 4);
    assert!(!result.html.contains("duplicate"));
}

#[test]
fn title_override_and_default() {
    let dir = TempDir::new().unwrap();
    istanbul_report(dir.path());

    let default = bundle(&BundleOptions::new(dir.path())).unwrap();
    assert!(default.html.contains("<title>Coverage Report</title>"));

    let custom = bundle(&BundleOptions::new(dir.path()).with_title("API Coverage")).unwrap();
    assert!(custom.html.contains("<title>API Coverage</title>"));
}

#[test]
fn missing_index_is_fatal() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/index.html", b"<body></body>");
    write(dir.path(), "base.css", b"a{}");

    let err = bundle(&BundleOptions::new(dir.path())).unwrap_err();
    assert!(matches!(err, BundleError::MissingIndex(_)));
}

#[test]
fn empty_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = bundle(&BundleOptions::new(dir.path())).unwrap_err();
    assert!(matches!(err, BundleError::NoHtmlFiles(_)));
}
