//! Page assembly around rendered markdown bodies.
//!
//! # Responsibility
//! - Emit complete HTML documents for post, index and tag pages.
//!
//! # Invariants
//! - Post links always use the `{base_url}/posts/{slug}/` shape.
//! - The math script block is emitted only for math-enabled posts.

use super::{escape_html, extract_headings, markdown_to_html, minify_html};
use crate::config::SiteConfig;
use crate::model::post::Post;
use crate::service::site_service::derive_summary;
use std::fmt::Write as _;

const KATEX_BLOCK: &str = concat!(
    r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.css">"#,
    "\n",
    r#"<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/katex.min.js"></script>"#,
    "\n",
    r#"<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.11/dist/contrib/auto-render.min.js" onload="renderMathInElement(document.body);"></script>"#,
);

/// Renders one complete post page.
pub fn post_page(post: &Post, config: &SiteConfig) -> String {
    let body_html = markdown_to_html(&post.body, post.meta.toc);
    let title = escape_html(&post.meta.title);

    let mut head_extra = String::new();
    if post.meta.math {
        head_extra.push_str(KATEX_BLOCK);
        head_extra.push('\n');
    }

    let mut article = String::new();
    let _ = writeln!(article, "<h1>{title}</h1>");
    let _ = writeln!(
        article,
        r#"<p class="meta"><time datetime="{date}">{date}</time>{tags}</p>"#,
        date = post.meta.date,
        tags = tag_line(post, config),
    );
    if post.meta.toc {
        article.push_str(&toc_block(&post.body));
    }
    article.push_str(&body_html);

    finish_document(&title, &head_extra, &article, config)
}

/// Renders the chronological index page.
pub fn index_page(posts: &[Post], config: &SiteConfig) -> String {
    let title = escape_html(&config.title);
    let mut list = String::new();
    list.push_str("<ul class=\"post-list\">\n");
    for post in posts {
        let summary = derive_summary(&post.body);
        let _ = writeln!(
            list,
            r#"<li><time datetime="{date}">{date}</time> <a href="{base}/posts/{slug}/">{post_title}</a>{summary}</li>"#,
            date = post.meta.date,
            base = config.base_url,
            slug = post.slug,
            post_title = escape_html(&post.meta.title),
            summary = summary
                .summary_text
                .map(|text| format!(" <span class=\"summary\">{}</span>", escape_html(&text)))
                .unwrap_or_default(),
        );
    }
    list.push_str("</ul>\n");

    finish_document(&title, "", &format!("<h1>{title}</h1>\n{list}"), config)
}

/// Renders one per-tag listing page.
pub fn tag_page(tag: &str, posts: &[Post], config: &SiteConfig) -> String {
    let tag = escape_html(tag);
    let mut list = String::new();
    list.push_str("<ul class=\"post-list\">\n");
    for post in posts {
        let _ = writeln!(
            list,
            r#"<li><time datetime="{date}">{date}</time> <a href="{base}/posts/{slug}/">{post_title}</a></li>"#,
            date = post.meta.date,
            base = config.base_url,
            slug = post.slug,
            post_title = escape_html(&post.meta.title),
        );
    }
    list.push_str("</ul>\n");

    let heading = format!("<h1>Tag: {tag}</h1>\n{list}");
    finish_document(&format!("Tag: {tag}"), "", &heading, config)
}

fn tag_line(post: &Post, config: &SiteConfig) -> String {
    if post.meta.tags.is_empty() {
        return String::new();
    }
    let mut line = String::from(r#" <span class="tags">"#);
    for (index, tag) in post.meta.tags.iter().enumerate() {
        if index > 0 {
            line.push_str(", ");
        }
        let _ = write!(
            line,
            r#"<a href="{base}/tags/{tag}/">{label}</a>"#,
            base = config.base_url,
            tag = tag,
            label = escape_html(tag),
        );
    }
    line.push_str("</span>");
    line
}

fn toc_block(body: &str) -> String {
    let headings = extract_headings(body);
    if headings.is_empty() {
        return String::new();
    }
    let mut nav = String::from("<nav class=\"toc\">\n<ul>\n");
    for heading in headings {
        let _ = writeln!(
            nav,
            r##"<li class="toc-l{level}"><a href="#{anchor}">{text}</a></li>"##,
            level = heading.level,
            anchor = heading.anchor,
            text = escape_html(&heading.text),
        );
    }
    nav.push_str("</ul>\n</nav>\n");
    nav
}

fn finish_document(title: &str, head_extra: &str, main: &str, config: &SiteConfig) -> String {
    let document = format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>{title}</title>\n",
            "{head_extra}",
            "</head>\n",
            "<body>\n",
            "<main>\n",
            "{main}\n",
            "</main>\n",
            "</body>\n",
            "</html>\n",
        ),
        title = title,
        head_extra = head_extra,
        main = main,
    );

    if config.minify {
        minify_html(&document)
    } else {
        document
    }
}
