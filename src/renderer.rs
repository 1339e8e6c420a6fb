//! Output document renderer: one self-contained HTML file
//!
//! Every page of the report becomes a hidden `<section>` inside a two-column
//! shell (sidebar tree + content). A small vanilla-JS runtime switches between
//! sections, keeps browser history in sync, and resolves any relative `.html`
//! link the static rewrite could not match.

use crate::assets::{mime_for, AssetSet, FAVICON};
use crate::links::{escape_json_for_script, PathIndex};
use crate::page::{Page, INDEX_PAGE};
use crate::tree::FileTreeNode;
use std::collections::HashMap;

/// Escapes text for HTML element content and double-quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Sidebar label for a page file name: `math.ts.html` -> `math.ts`
pub fn display_name(file_name: &str) -> &str {
    file_name.strip_suffix(".html").unwrap_or(file_name)
}

/// Renders the bundle document
pub struct HtmlRenderer<'a> {
    title: &'a str,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(title: &'a str) -> Self {
        Self { title }
    }

    /// Render the full document. `pages` must already carry rewritten bodies.
    pub fn render(
        &self,
        pages: &[Page],
        tree: &[FileTreeNode],
        index: &PathIndex,
        assets: &AssetSet,
    ) -> String {
        let content_len: usize = pages.iter().map(|p| p.body().len()).sum();
        let mut html = String::with_capacity(content_len + 32_768);

        self.push_head(&mut html, assets);

        html.push_str("<div class=\"bundle-shell\">\n");
        self.push_sidebar(&mut html, pages, tree, index);
        html.push_str("<main class=\"bundle-content\">\n");
        for page in pages {
            push_page(&mut html, page);
        }
        html.push_str("</main>\n</div>\n");

        let scripts = assets.script_text();
        if !scripts.is_empty() {
            html.push_str("<script>\n");
            html.push_str(&escape_json_for_script(&scripts));
            html.push_str("</script>\n");
        }
        html.push_str("<script>\nconst PATH_INDEX=");
        html.push_str(&index.to_script_json());
        html.push_str(";\nconst INDEX_PAGE=\"");
        html.push_str(INDEX_PAGE);
        html.push_str("\";\n");
        html.push_str(Self::template_runtime());
        html.push_str("</script>\n</body>\n</html>\n");
        html
    }

    fn push_head(&self, html: &mut String, assets: &AssetSet) {
        html.push_str(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        );
        html.push_str(&format!("<title>{}</title>\n", escape_html(self.title)));
        if let Some(uri) = assets.favicon_data_uri() {
            html.push_str(&format!(
                "<link rel=\"icon\" type=\"{}\" href=\"{}\">\n",
                mime_for(FAVICON),
                uri
            ));
        }
        html.push_str("<style>\n");
        html.push_str(&assets.stylesheet_text());
        html.push_str(Self::template_shell_css());
        html.push_str("</style>\n</head>\n<body>\n");
    }

    fn push_sidebar(&self, html: &mut String, pages: &[Page], tree: &[FileTreeNode], index: &PathIndex) {
        let titles: HashMap<&str, &str> = pages.iter().map(|p| (p.path(), p.title())).collect();
        html.push_str("<nav class=\"bundle-sidebar\" aria-label=\"Report files\">\n");
        html.push_str(&format!(
            "<div class=\"bundle-sidebar-title\">{}</div>\n",
            escape_html(self.title)
        ));
        html.push_str("<ul class=\"bundle-tree\">\n");
        push_nodes(html, tree, index, &titles);
        html.push_str("</ul>\n</nav>\n");
    }

    // ─── Template pieces ────────────────────────────────────────────────

    fn template_shell_css() -> &'static str {
        r##"
/* ── Bundle shell ── */
.bundle-shell{display:flex;min-height:100vh}
.bundle-sidebar{position:fixed;top:0;left:0;bottom:0;width:280px;overflow-y:auto;background:#f6f8fa;border-right:1px solid #d0d7de;padding:.75rem 0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;font-size:13px;box-sizing:border-box;z-index:10}
.bundle-sidebar-title{font-weight:700;font-size:14px;padding:0 1rem .75rem;border-bottom:1px solid #d0d7de;margin-bottom:.5rem}
.bundle-sidebar ul{list-style:none;margin:0;padding:0}
.bundle-sidebar ul ul{padding-left:.875rem}
.bundle-sidebar a{display:block;padding:.2rem 1rem;color:#24292f;text-decoration:none;white-space:nowrap;overflow:hidden;text-overflow:ellipsis}
.bundle-sidebar a:hover{background:#eaeef2}
.bundle-sidebar a.current{background:#ddf4ff;color:#0969da;font-weight:600}
.bundle-folder-hdr{display:flex;align-items:center;gap:.375rem;width:100%;padding:.2rem 1rem;border:none;background:none;font:inherit;font-weight:600;color:#24292f;cursor:pointer;text-align:left;user-select:none}
.bundle-folder-hdr:hover{background:#eaeef2}
.bundle-folder-hdr .chevron{font-size:9px;color:#57606a;transition:transform .15s;width:10px}
.bundle-folder.open>.bundle-folder-hdr .chevron{transform:rotate(90deg)}
.bundle-folder>.bundle-folder-body{display:none}
.bundle-folder.open>.bundle-folder-body{display:block}
.bundle-content{flex:1;min-width:0;margin-left:280px}
.bundle-page{display:none}
.bundle-page.active{display:block}
@media(max-width:768px){
  .bundle-shell{flex-direction:column}
  .bundle-sidebar{position:static;width:auto;max-height:40vh;border-right:none;border-bottom:1px solid #d0d7de}
  .bundle-content{margin-left:0}
}
"##
    }

    fn template_runtime() -> &'static str {
        r##"(function(){
"use strict";

const INDEX_ID=PATH_INDEX[INDEX_PAGE];
const KNOWN=new Set(Object.values(PATH_INDEX));
const pages=[...document.querySelectorAll('.bundle-page')];
const links=[...document.querySelectorAll('.bundle-sidebar a[data-page-id]')];
const baseTitle=document.title;
let current=null;

/* same rules as the static rewrite: relative to the page's directory */
function resolvePath(from,target){
  const stack=from.replace(/\\/g,'/').split('/').filter(s=>s.length);
  stack.pop();
  for(const seg of target.replace(/\\/g,'/').split('/')){
    if(!seg||seg==='.')continue;
    if(seg==='..'){stack.pop();continue}
    stack.push(seg);
  }
  return stack.join('/');
}

function decode(s){
  try{return decodeURIComponent(s)}catch(_){return s}
}

function hashName(){
  return decode(location.hash.slice(1));
}

function idFromHash(){
  const h=hashName();
  return KNOWN.has(h)?h:null;
}

/* in-page anchors such as Istanbul's <a name='L12'> line markers */
function findAnchor(root,name){
  const q=CSS.escape(name);
  return root.querySelector('[id="'+q+'"],a[name="'+q+'"]');
}

function pageForAnchor(name){
  if(!name)return null;
  const page=pages.find(p=>findAnchor(p,name));
  return page?page.dataset.pageId:null;
}

function scrollToAnchor(name){
  const page=pages.find(p=>p.dataset.pageId===current);
  const el=page&&findAnchor(page,name);
  if(el)el.scrollIntoView();
}

/* a null state comes from fragment navigation inside the current page */
function popTarget(state){
  return (state&&state.page)||idFromHash()||current||INDEX_ID;
}

function reveal(link){
  let el=link.parentElement;
  while(el&&!el.classList.contains('bundle-sidebar')){
    if(el.classList.contains('bundle-folder'))el.classList.add('open');
    el=el.parentElement;
  }
}

function show(id,push){
  const target=pages.find(p=>p.dataset.pageId===id);
  if(!target){console.warn('coverage-bundler: no page with id "'+id+'"');return false}
  pages.forEach(p=>p.classList.toggle('active',p===target));
  links.forEach(a=>{
    const on=a.dataset.pageId===id;
    a.classList.toggle('current',on);
    if(on)reveal(a);
  });
  document.title=id===INDEX_ID?baseTitle:(target.dataset.title||baseTitle);
  current=id;
  if(push&&!(history.state&&history.state.page===id))history.pushState({page:id},'','#'+id);
  window.scrollTo(0,0);
  return true;
}

function onContentClick(e){
  if(e.defaultPrevented||e.button!==0||e.metaKey||e.ctrlKey||e.shiftKey||e.altKey)return;
  const a=e.target.closest('a[href]');
  if(!a)return;
  const href=a.getAttribute('href');
  if(href.charAt(0)==='#'){
    const id=decode(href.slice(1));
    if(KNOWN.has(id)){e.preventDefault();show(id,true);return}
    const wrapper=a.closest('.bundle-page');
    const el=wrapper&&id&&findAnchor(wrapper,id);
    if(el){
      e.preventDefault();
      history.pushState({page:current,anchor:id},'','#'+encodeURIComponent(id));
      el.scrollIntoView();
    }
    return;
  }
  if(/^([a-z][a-z0-9+.-]*:)?\/\//i.test(href))return;
  const m=href.match(/^([^?#]*\.html)([?#].*)?$/i);
  if(!m)return;
  e.preventDefault();
  const wrapper=a.closest('.bundle-page');
  const from=wrapper?wrapper.dataset.pagePath:INDEX_PAGE;
  const resolved=resolvePath(from,m[1]);
  const id=PATH_INDEX[resolved];
  if(id){show(id,true)}
  else{console.warn('coverage-bundler: cannot resolve "'+href+'" from '+from+' (tried '+resolved+')')}
}

function init(){
  links.forEach(a=>a.addEventListener('click',e=>{e.preventDefault();show(a.dataset.pageId,true)}));
  document.querySelectorAll('.bundle-folder-hdr').forEach(h=>{
    h.addEventListener('click',()=>h.parentElement.classList.toggle('open'));
  });
  document.querySelector('.bundle-content').addEventListener('click',onContentClick);
  window.addEventListener('popstate',e=>{
    const id=popTarget(e.state);
    if(id!==current)show(id,false);
    const anchor=(e.state&&e.state.anchor)||(idFromHash()?null:hashName());
    if(anchor)scrollToAnchor(anchor);
  });
  window.addEventListener('hashchange',()=>{const id=idFromHash();if(id&&id!==current)show(id,false)});
  const anchor=idFromHash()?null:(hashName()||null);
  const start=idFromHash()||pageForAnchor(anchor)||INDEX_ID;
  show(start,false);
  history.replaceState(anchor?{page:start,anchor:anchor}:{page:start},'');
  if(anchor)scrollToAnchor(anchor);
  if(typeof window.prettyPrint==='function')window.prettyPrint();
}

if(document.readyState==='loading')document.addEventListener('DOMContentLoaded',init);
else init();
})();
"##
    }
}

fn push_nodes(
    html: &mut String,
    nodes: &[FileTreeNode],
    index: &PathIndex,
    titles: &HashMap<&str, &str>,
) {
    for node in nodes {
        match node {
            FileTreeNode::Folder { name, children } => {
                html.push_str("<li class=\"bundle-folder\">");
                html.push_str(&format!(
                    "<button type=\"button\" class=\"bundle-folder-hdr\"><span class=\"chevron\">▶</span>{}</button>\n",
                    escape_html(name)
                ));
                html.push_str("<ul class=\"bundle-folder-body\">\n");
                push_nodes(html, children, index, titles);
                html.push_str("</ul></li>\n");
            }
            FileTreeNode::Leaf { name, path } => {
                // every leaf comes from a collected page, so the lookup only
                // misses if the tree and index were built from different sets
                let Some(id) = index.get(path) else { continue };
                let title = titles.get(path.as_str()).copied().unwrap_or(name.as_str());
                html.push_str(&format!(
                    "<li class=\"bundle-file\"><a href=\"#{id}\" data-page-id=\"{id}\" title=\"{}\">{}</a></li>\n",
                    escape_html(title),
                    escape_html(display_name(name))
                ));
            }
        }
    }
}

fn push_page(html: &mut String, page: &Page) {
    let class = if page.is_index() {
        "bundle-page active"
    } else {
        "bundle-page"
    };
    html.push_str(&format!(
        "<section class=\"{class}\" id=\"{id}\" data-page-id=\"{id}\" data-page-path=\"{}\" data-title=\"{}\">\n",
        escape_html(page.path()),
        escape_html(page.title()),
        id = page.id(),
    ));
    html.push_str(page.body());
    html.push_str("\n</section>\n");
}
