//! The single rewriter pass that swaps images and links for placeholders.
//!
//! Placeholders are built from private-use code points, which neither the
//! rule table nor entity decoding ever touch.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::{Qa2TexError, Result};

const IMAGE_OPEN: char = '\u{E000}';
const IMAGE_CLOSE: char = '\u{E001}';
const LINK_OPEN: char = '\u{E002}';
const LINK_MID: char = '\u{E003}';
const LINK_CLOSE: char = '\u{E004}';

static IMAGE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").unwrap());
static LINK_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?s)\u{E002}(\\d+)\u{E003}(.*?)\u{E004}").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// An image found in the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGroup {
    /// Absolute source URL; `None` when `src` cannot be resolved.
    pub url: Option<Url>,
    pub alt: String,
    /// File name the image is stored under: the last path segment.
    pub name: Option<String>,
}

/// A link found in the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkGroup {
    /// Target, absolute when it could be resolved against the base URL.
    pub url: String,
}

/// Output of [`tokenize`].
#[derive(Debug, Default)]
pub struct Tokenized {
    pub markup: String,
    pub images: Vec<ImageGroup>,
    pub links: Vec<LinkGroup>,
}

fn image_token(index: usize) -> String {
    format!("{IMAGE_OPEN}{index}{IMAGE_CLOSE}")
}

/// Replaces every `img[src]` with an image placeholder and wraps the content
/// of every `a[href]` in link placeholders.
pub fn tokenize(html: &str, base_url: &Url) -> Result<Tokenized> {
    let mut output = Vec::with_capacity(html.len());
    let mut images = Vec::new();
    let mut links = Vec::new();

    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: vec![
                lol_html::element!("img[src]", |el| {
                    let src = el.get_attribute("src").unwrap_or_default();
                    let url = base_url.join(&html_escape::decode_html_entities(src.trim())).ok();
                    let name = url.as_ref().and_then(file_name);
                    let alt = el.get_attribute("alt").unwrap_or_default();

                    el.replace(&image_token(images.len()), lol_html::html_content::ContentType::Html);
                    images.push(ImageGroup { url, alt, name });
                    Ok(())
                }),
                lol_html::element!("a[href]", |el| {
                    let href = el.get_attribute("href").unwrap_or_default();
                    let href = html_escape::decode_html_entities(href.trim()).into_owned();
                    let url = base_url.join(&href).map(String::from).unwrap_or(href);

                    let open = format!("{LINK_OPEN}{}{LINK_MID}", links.len());
                    el.before(&open, lol_html::html_content::ContentType::Html);
                    el.after(&LINK_CLOSE.to_string(), lol_html::html_content::ContentType::Html);
                    el.remove_and_keep_content();
                    links.push(LinkGroup { url });
                    Ok(())
                }),
            ],
            ..Default::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter.write(html.as_bytes()).map_err(|e| Qa2TexError::RewriteError(e.to_string()))?;
    rewriter.end().map_err(|e| Qa2TexError::RewriteError(e.to_string()))?;

    let markup = String::from_utf8(output).map_err(|e| Qa2TexError::RewriteError(e.to_string()))?;
    Ok(Tokenized { markup, images, links })
}

/// The last non-empty path segment of `url`.
fn file_name(url: &Url) -> Option<String> {
    url.path_segments()?
        .next_back()
        .filter(|segment| !segment.is_empty())
        .map(String::from)
}

/// Turns link placeholders into `\href{url}{text}`.
///
/// The visible text loses any remaining tags and has its backslashes
/// doubled. A link around an image is dropped and its content kept, so the
/// figure survives.
pub fn render_links(markup: &str, links: &[LinkGroup]) -> String {
    LINK_TOKEN
        .replace_all(markup, |caps: &regex::Captures<'_>| {
            let content = &caps[2];
            let link = caps[1].parse::<usize>().ok().and_then(|i| links.get(i));

            match link {
                Some(link) if !content.contains(IMAGE_OPEN) => {
                    let text = TAG.replace_all(content, "").replace('\\', r"\\");
                    format!(r"\href{{{}}}{{{}}}", link.url, text)
                }
                _ => content.to_string(),
            }
        })
        .into_owned()
}

/// Replaces each image placeholder with `render(index)`.
pub fn render_images(markup: &str, mut render: impl FnMut(usize) -> String) -> String {
    IMAGE_TOKEN
        .replace_all(markup, |caps: &regex::Captures<'_>| match caps[1].parse::<usize>() {
            Ok(index) => render(index),
            Err(_) => String::new(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://tex.stackexchange.com/questions/1/x").unwrap()
    }

    #[test]
    fn test_images_become_tokens() {
        let html = r#"<p>See <img src="https://i.stack.imgur.com/abc.png" alt="plot"> and <img src="/img/d.jpg"></p>"#;
        let tokens = tokenize(html, &base()).unwrap();

        assert_eq!(tokens.images.len(), 2);
        assert_eq!(tokens.images[0].name.as_deref(), Some("abc.png"));
        assert_eq!(tokens.images[0].alt, "plot");
        assert_eq!(
            tokens.images[1].url.as_ref().map(Url::as_str),
            Some("https://tex.stackexchange.com/img/d.jpg")
        );
        assert!(!tokens.markup.contains("<img"));
        assert_eq!(tokens.markup, format!("<p>See {} and {}</p>", image_token(0), image_token(1)));
    }

    #[test]
    fn test_links_render_as_href() {
        let html = r#"Read <a href="/q/5">the <b>docs</b> at C:\tex</a>."#;
        let tokens = tokenize(html, &base()).unwrap();
        let rendered = render_links(&tokens.markup, &tokens.links);

        assert_eq!(rendered, r"Read \href{https://tex.stackexchange.com/q/5}{the docs at C:\\tex}.");
    }

    #[test]
    fn test_attribute_entities_decoded_before_join() {
        let html = r#"<a href="/search?q=tikz&amp;page=2">more</a><img src="/i.png?a=1&amp;b=2">"#;
        let tokens = tokenize(html, &base()).unwrap();

        assert_eq!(
            tokens.images[0].url.as_ref().map(Url::as_str),
            Some("https://tex.stackexchange.com/i.png?a=1&b=2")
        );
        assert_eq!(tokens.images[0].name.as_deref(), Some("i.png"));
        assert_eq!(tokens.links[0].url, "https://tex.stackexchange.com/search?q=tikz&page=2");
    }

    #[test]
    fn test_link_around_image_is_unwrapped() {
        let html = r#"<a href="https://i.stack.imgur.com/big.png"><img src="https://i.stack.imgur.com/small.png" alt=""></a>"#;
        let tokens = tokenize(html, &base()).unwrap();
        let rendered = render_links(&tokens.markup, &tokens.links);

        assert_eq!(rendered, image_token(0));
        assert_eq!(render_images(&rendered, |i| format!("[{i}]")), "[0]");
    }

    #[test]
    fn test_image_without_path_segment_has_no_name() {
        let tokens = tokenize(r#"<img src="https://example.com/">"#, &base()).unwrap();
        assert_eq!(tokens.images[0].name, None);
    }
}
