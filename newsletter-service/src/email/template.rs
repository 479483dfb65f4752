//! Fixed HTML scaffold wrapped around rendered newsletter content.

use super::Branding;

/// Unsubscribe placeholder recognized by the downstream email platform.
/// The `<unsubscribe>` tag is rewritten into a personalized link at send time.
pub fn unsubscribe_block() -> String {
    concat!(
        r#"<p style="text-align: center; margin-top: 20px; font-size: 16px;">"#,
        r#"<unsubscribe style="color: #666666; text-decoration: none;">Unsubscribe here</unsubscribe>"#,
        "</p>"
    )
    .to_string()
}

/// Branding header prepended to every email body.
pub fn header_block(branding: &Branding) -> String {
    format!(
        concat!(
            r#"<a href="{site_url}" style="text-align: center; display: block; margin: 20px auto;border-bottom:2px solid {accent};">"#,
            r#"<img src="{logo_url}" alt="{site_name} Logo" style="padding-bottom:10px;max-width: 60px; height: auto; display: block; margin: 0 auto;">"#,
            "</a>"
        ),
        site_url = branding.site_url,
        accent = branding.accent_color,
        logo_url = branding.logo_url,
        site_name = branding.site_name,
    )
}

/// Footer with the web-archive link, cross-site navigation, supporter note,
/// and the unsubscribe placeholder.
pub fn footer_block(branding: &Branding) -> String {
    let nav = if branding.footer_links.is_empty() {
        String::new()
    } else {
        let links: Vec<String> = branding
            .footer_links
            .iter()
            .map(|link| format!(r#"<a href="{}">{}</a>"#, link.url, link.label))
            .collect();
        format!("<p>{}</p>\n        ", links.join(" &middot; "))
    };

    format!(
        concat!(
            r#"<footer style="text-align: center; padding-top: 20px; font-size: 16px; line-height: 1.5em;">"#,
            "\n        ",
            r#"<p>Read this newsletter &amp; all others on the web at <a href="{archive_url}">{archive_url}</a></p>"#,
            "\n        ",
            "{nav}",
            "<p>{footer_note}</p>\n        ",
            "{unsubscribe}\n        ",
            "</footer>"
        ),
        archive_url = branding.archive_url,
        nav = nav,
        footer_note = branding.footer_note,
        unsubscribe = unsubscribe_block(),
    )
}

/// Wrap rendered content in the complete standalone email document.
pub fn email_document(subject: &str, content: &str, branding: &Branding) -> String {
    format!(
        r#"<html>
<head>
    <title>{subject}</title>
</head>
<body style="background: #d8d8d8; font-family: Helvetica, sans-serif; padding: 0; margin: 0; width: 100%;">
    <div style="background: #fff; border: 1px solid #000; max-width: 600px; margin: 20px auto; padding: 0 20px; box-sizing: border-box;">
        {content}
        {footer}
    </div>
</body>
</html>"#,
        subject = subject,
        content = content,
        footer = footer_block(branding),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_contains_unsubscribe_tag() {
        let doc = email_document("Subject", "<p>Body</p>", &Branding::default());

        assert!(doc.contains("<unsubscribe"));
        assert!(doc.contains("</unsubscribe>"));
    }

    #[test]
    fn test_document_contains_archive_link_and_title() {
        let branding = Branding::default();
        let doc = email_document("March Issue", "<p>Body</p>", &branding);

        assert!(doc.contains("<title>March Issue</title>"));
        assert!(doc.contains(&branding.archive_url));
    }

    #[test]
    fn test_footer_renders_cross_site_links() {
        let mut branding = Branding::default();
        branding.footer_links = vec![
            super::super::FooterLink {
                label: "Shop".to_string(),
                url: "https://shop.example.com".to_string(),
            },
            super::super::FooterLink {
                label: "Community".to_string(),
                url: "https://community.example.com".to_string(),
            },
        ];

        let footer = footer_block(&branding);
        assert!(footer.contains(r#"<a href="https://shop.example.com">Shop</a>"#));
        assert!(footer.contains("&middot;"));
    }
}
