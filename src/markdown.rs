use comrak::nodes::{AstNode, NodeValue};
use comrak::plugins::syntect::SyntectAdapter;
use comrak::{Arena, ComrakOptions, ComrakPlugins, format_html_with_plugins, parse_document};
use once_cell::sync::Lazy;

const MAX_HEADING_LEVEL: u8 = 3;
const LINK_OPEN: &str = "<a href=\"";
const SAFE_LINK_OPEN: &str = "<a target=\"_blank\" rel=\"noopener noreferrer\" href=\"";

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    // Raw HTML is shown as text and unsafe URLs are dropped
    options.render.unsafe_ = false;
    options.render.escape = true;
    options
});

/// Renders assistant content to HTML that is safe to inject.
///
/// Only paragraphs, headings up to level 3, lists, code, blockquotes, tables
/// and links survive. Images degrade to links and every link opens in a new
/// context without an opener reference.
pub fn render_markdown(md: &str) -> String {
    let arena = Arena::new();
    let root = parse_document(&arena, md, &MARKDOWN_OPTIONS);
    restrict_nodes(root);

    let adapter = SyntectAdapter::new(Some("base16-ocean.dark"));
    let mut plugins = ComrakPlugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&adapter);

    let mut html = Vec::new();
    if let Err(err) = format_html_with_plugins(root, &MARKDOWN_OPTIONS, &mut html, &plugins) {
        tracing::warn!(error = %err, "markdown rendering failed");
        return escape_plain(md);
    }
    String::from_utf8_lossy(&html).replace(LINK_OPEN, SAFE_LINK_OPEN)
}

fn restrict_nodes<'a>(root: &'a AstNode<'a>) {
    for node in root.descendants() {
        let mut data = node.data.borrow_mut();
        let replacement = match &data.value {
            NodeValue::Heading(heading) if heading.level > MAX_HEADING_LEVEL => {
                let mut heading = *heading;
                heading.level = MAX_HEADING_LEVEL;
                Some(NodeValue::Heading(heading))
            }
            NodeValue::Image(link) => Some(NodeValue::Link(link.clone())),
            _ => None,
        };
        if let Some(value) = replacement {
            data.value = value;
        }
    }
}

fn escape_plain(text: &str) -> String {
    let mut html = b"<p>".to_vec();
    if let Err(err) = comrak::html::escape(&mut html, text.as_bytes()) {
        tracing::warn!(error = %err, "escaping fallback text failed");
        return String::new();
    }
    html.extend_from_slice(b"</p>");
    String::from_utf8_lossy(&html).into_owned()
}

/// Returns `url` when it is safe to put in an `href`: `http` or `https` only.
pub fn safe_link(url: &str) -> Option<&str> {
    let url = url.trim();
    let (scheme, rest) = url.split_once(':')?;
    let allowed = scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https");
    (allowed && rest.starts_with("//")).then_some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fallback_is_escaped() {
        assert_eq!(
            escape_plain("<script>\"x\" & y</script>"),
            "<p>&lt;script&gt;&quot;x&quot; &amp; y&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn only_web_links_are_linkable() {
        assert_eq!(safe_link("https://www.nice.org.uk/ng136"), Some("https://www.nice.org.uk/ng136"));
        assert_eq!(safe_link(" HTTP://example.org "), Some("HTTP://example.org"));
        assert_eq!(safe_link("javascript:alert(1)"), None);
        assert_eq!(safe_link("JavaScript://%0Aalert(1)"), None);
        assert_eq!(safe_link("data:text/html,<b>x</b>"), None);
        assert_eq!(safe_link("vbscript:msgbox"), None);
        assert_eq!(safe_link("/relative/path"), None);
        assert_eq!(safe_link(""), None);
    }

    #[test]
    fn renders_whitelisted_blocks() {
        let html = render_markdown(
            "## Assessment\n\n- fever\n- cough\n\n1. rest\n\n> monitor\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n`inline`",
        );
        assert!(html.contains("<h2>Assessment</h2>"));
        assert!(html.contains("<ul>"));
        assert!(html.contains("<ol>"));
        assert!(html.contains("<blockquote>"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<code>inline</code>"));
    }

    #[test]
    fn deep_headings_are_clamped() {
        let html = render_markdown("##### Small print");
        assert!(html.contains("<h3>Small print</h3>"));
        assert!(!html.contains("<h5>"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let html =
            render_markdown("<script>alert(1)</script>\n\nhello <img src=x onerror=alert(1)>");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn links_open_without_opener() {
        let html = render_markdown("[NICE guideline](https://www.nice.org.uk)");
        assert!(html.contains(
            "<a target=\"_blank\" rel=\"noopener noreferrer\" href=\"https://www.nice.org.uk\">"
        ));
    }

    #[test]
    fn javascript_links_are_neutralised() {
        let html = render_markdown("[click](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn images_become_links() {
        let html = render_markdown("![scan](https://example.com/scan.png)");
        assert!(!html.contains("<img"));
        assert!(html.contains("href=\"https://example.com/scan.png\""));
    }
}
