//! HTML parsing and DOM querying.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and navigating the DOM tree using CSS selectors. Indexed access is
//! always fallible: a layout variant that omits an element yields `None`
//! rather than a panic, and callers decide whether that is a failure.
//!
//! # Example
//!
//! ```rust
//! use qa2tex_core::parse::Document;
//!
//! let html = r#"
//!     <div id="question-header"><h1><a href="/q/1">How do I align?</a></h1></div>
//!     <div class="post-text"><p>Body</p></div>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let title = doc.select_first("div#question-header a").unwrap().unwrap();
//! assert_eq!(title.text(), "How do I align?");
//! ```

use scraper::{Html, Selector};
use url::Url;

use crate::{Qa2TexError, Result};

/// Represents a parsed HTML document or fragment.
///
/// # Example
///
/// ```rust
/// use qa2tex_core::parse::Document;
///
/// let html = "<html><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html).unwrap();
/// assert_eq!(doc.root().trimmed_text(), "Hello");
/// ```
pub struct Document {
    html: Html,
    base_url: Option<Url>,
}

impl Document {
    /// Parses a full HTML document.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, base_url: None })
    }

    /// Parses a full HTML document that was fetched from `base_url`.
    ///
    /// The base URL is used to resolve relative `href`/`src` attributes.
    pub fn parse_with_url(html: &str, base_url: Url) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, base_url: Some(base_url) })
    }

    /// Gets the base URL the document was fetched from.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`Qa2TexError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qa2tex_core::parse::Document;
    ///
    /// let html = r#"<li class="comment">First</li><li class="comment">Second</li>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("li.comment").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching `selector`, if any.
    pub fn select_first(&self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }

    /// The root element, used as the scope for document-wide queries.
    pub fn root(&self) -> Element<'_> {
        Element { element: self.html.root_element() }
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Qa2TexError::HtmlParseError(format!("Invalid selector {selector:?}: {e}")))
}

/// A wrapper around scraper's ElementRef.
///
/// Elements are cheap copies of a reference into their [`Document`], so
/// selections made from an element live as long as the document.
///
/// # Example
///
/// ```rust
/// use qa2tex_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the text content with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    /// Whether this element itself carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.element.value().classes().any(|c| c == class)
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`Qa2TexError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first descendant matching `selector`.
    pub fn select_first(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).next().map(|el| Element { element: el }))
    }

    /// Selects the last descendant matching `selector`.
    pub fn select_last(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).last().map(|el| Element { element: el }))
    }

    /// Selects the `index`-th (zero based) descendant matching `selector`.
    pub fn select_nth(&self, selector: &str, index: usize) -> Result<Option<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).nth(index).map(|el| Element { element: el }))
    }

    /// Whether any descendant matches `selector`.
    pub fn contains(&self, selector: &str) -> Result<bool> {
        Ok(self.select_first(selector)?.is_some())
    }

    /// All anchor descendants, in document order.
    pub fn anchors(&self) -> Result<Vec<Element<'a>>> {
        self.select("a")
    }
}
