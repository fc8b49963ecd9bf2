//! Fetches an article URL and reduces its HTML to plain text.
//!
//! This is deliberately not a real HTML parser. Scripts and styles are
//! stripped, remaining tags become whitespace, and the result is collapsed
//! and truncated. Good enough as AI input, nothing more.

use std::sync::LazyLock;

use regex::Regex;

use crate::ScrapeError;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; KillerListings/1.0)";

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Maximum number of characters of article text kept for extraction.
pub const MAX_ARTICLE_CHARS: usize = 8000;

/// Fetches the page at `url` and returns its plain-text content.
///
/// # Errors
///
/// Returns [`ScrapeError`] if the request fails or the server responds
/// with a non-success status.
pub async fn fetch_article(client: &reqwest::Client, url: &str) -> Result<String, ScrapeError> {
    let resp = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(ScrapeError::Status {
            status: resp.status().as_u16(),
        });
    }

    let html = resp.text().await?;
    Ok(html_to_text(&html))
}

/// Strips HTML down to plain text.
///
/// Removes `<script>` and `<style>` blocks entirely, replaces every other
/// tag with a space, collapses whitespace runs, and truncates to
/// [`MAX_ARTICLE_CHARS`] characters.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, " ");
    let text = STYLE_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, " ");
    let text = WHITESPACE_RE.replace_all(&text, " ");

    text.trim().chars().take(MAX_ARTICLE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_collapses_whitespace() {
        let html = "<html><body><h1>Man killed</h1>\n\n<p>A man was   killed in \
                    <b>Vancouver</b>.</p></body></html>";
        assert_eq!(html_to_text(html), "Man killed A man was killed in Vancouver .");
    }

    #[test]
    fn removes_script_and_style_blocks() {
        let html = "<script type=\"text/javascript\">var x = '<p>not text</p>';</script>\
                    <style>.a { color: red; }</style><p>Real content</p>";
        assert_eq!(html_to_text(html), "Real content");
    }

    #[test]
    fn removes_multiline_scripts_case_insensitively() {
        let html = "<SCRIPT>\nfunction f() {\n  return 1;\n}\n</SCRIPT>body text";
        assert_eq!(html_to_text(html), "body text");
    }

    #[test]
    fn truncates_long_articles() {
        let html = format!("<p>{}</p>", "a".repeat(MAX_ARTICLE_CHARS * 2));
        assert_eq!(html_to_text(&html).chars().count(), MAX_ARTICLE_CHARS);
    }

    #[test]
    fn empty_input_yields_empty_text() {
        assert_eq!(html_to_text(""), "");
    }
}
