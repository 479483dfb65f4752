//! Transformation of host-rendered post content into a self-contained HTML
//! email plus a plain-text fallback.
//!
//! Email clients largely ignore `<style>` blocks and many refuse iframes, so
//! the renderer inlines a fixed set of styles and rewrites video embeds into
//! clickable thumbnails. The output is a pure function of the input post and
//! the branding configuration: identical input yields byte-identical output.

use regex::Regex;
use scraper::Html;

use super::template::{email_document, header_block};
use super::{Branding, EmailContent, Post};

const IMG_STYLE: &str = "height: auto; max-width:100%; object-fit:contain;";
const FIGURE_STYLE: &str = "text-align: center; margin: auto;";
const FIGCAPTION_STYLE: &str = "text-align: center;font-size: 15px;padding:5px;";
const PARAGRAPH_STYLE: &str = "font-size: 16px; line-height:1.75em;";
const HEADING_STYLE: &str = "text-align: center;";
const LIST_STYLE: &str = "font-size: 16px; line-height:1.75em;padding-inline-start:20px;";
const LIST_ITEM_STYLE: &str = "margin: 10px 0;";

/// Renders posts into sendable email content.
///
/// Compiles its rewrite patterns once at construction; build one and reuse it.
pub struct EmailRenderer {
    branding: Branding,
    re_img: Regex,
    re_youtube_figure: Regex,
    re_figure: Regex,
    re_figcaption: Regex,
    re_paragraph: Regex,
    re_heading: Regex,
    re_list: Regex,
    re_list_item: Regex,
}

impl EmailRenderer {
    pub fn new(branding: Branding) -> Self {
        Self {
            branding,
            re_img: Regex::new(r#"(?i)<img(.+?)src="(.*?)"(.*?)>"#).expect("invalid img pattern"),
            re_youtube_figure: Regex::new(concat!(
                r#"(?s)<figure[^>]*>\s*<div class="wp-block-embed__wrapper">\s*"#,
                r#"<iframe[^>]+src="https://www\.youtube\.com/embed/([a-zA-Z0-9_\-]+)[^"]*"[^>]*>"#,
                r#"</iframe>\s*</div>\s*</figure>"#,
            ))
            .expect("invalid youtube pattern"),
            re_figure: Regex::new(r"(?i)<figure([^>]*)>").expect("invalid figure pattern"),
            re_figcaption: Regex::new(r"(?i)<figcaption([^>]*)>")
                .expect("invalid figcaption pattern"),
            re_paragraph: Regex::new(r"(?i)<p([^>]*)>").expect("invalid paragraph pattern"),
            re_heading: Regex::new(r"(?i)<h2([^>]*)>").expect("invalid heading pattern"),
            re_list: Regex::new(r"(?i)<(ol|ul)([^>]*)>").expect("invalid list pattern"),
            re_list_item: Regex::new(r"(?i)<li([^>]*)>").expect("invalid list item pattern"),
        }
    }

    /// Render a post into subject, HTML document, and plain-text fallback.
    pub fn render(&self, post: &Post) -> EmailContent {
        let mut content = post.content.clone();

        // Images first so video thumbnails inserted below keep their own styling.
        content = self
            .re_img
            .replace_all(&content, |caps: &regex::Captures| {
                format!(
                    r#"<img{}src="{}"{} style="{}">"#,
                    &caps[1], &caps[2], &caps[3], IMG_STYLE
                )
            })
            .into_owned();

        content = self
            .re_youtube_figure
            .replace_all(&content, |caps: &regex::Captures| {
                let video_id = &caps[1];
                format!(
                    concat!(
                        r#"<a href="https://www.youtube.com/watch?v={id}" target="_blank">"#,
                        r#"<img src="https://img.youtube.com/vi/{id}/maxresdefault.jpg" alt="Watch our video" "#,
                        r#"style="height: auto; max-width: 100%; display: block; margin: 0 auto;">"#,
                        "</a>"
                    ),
                    id = video_id
                )
            })
            .into_owned();

        content = self
            .re_figure
            .replace_all(&content, format!(r#"<figure$1 style="{}">"#, FIGURE_STYLE).as_str())
            .into_owned();
        content = self
            .re_figcaption
            .replace_all(
                &content,
                format!(r#"<figcaption$1 style="{}">"#, FIGCAPTION_STYLE).as_str(),
            )
            .into_owned();
        content = self
            .re_paragraph
            .replace_all(&content, format!(r#"<p$1 style="{}">"#, PARAGRAPH_STYLE).as_str())
            .into_owned();
        content = self
            .re_heading
            .replace_all(&content, format!(r#"<h2$1 style="{}">"#, HEADING_STYLE).as_str())
            .into_owned();
        content = self
            .re_list
            .replace_all(&content, format!(r#"<$1$2 style="{}">"#, LIST_STYLE).as_str())
            .into_owned();
        content = self
            .re_list_item
            .replace_all(&content, format!(r#"<li$1 style="{}">"#, LIST_ITEM_STYLE).as_str())
            .into_owned();

        let plain_text = strip_tags(&content);

        let body = format!("{}{}", header_block(&self.branding), content);
        let html_body = email_document(&post.title, &body, &self.branding);

        EmailContent {
            subject: post.title.clone(),
            html_body,
            plain_text,
        }
    }
}

/// Collapse an HTML fragment to its text content.
fn strip_tags(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.trim().to_string()
}
