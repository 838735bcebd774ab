//! Resolving user input to a question link.
//!
//! Users paste either a numeric question ID or any link that points at a
//! question (`/q/123`, `/a/456`, `/questions/123/some-slug`). Both become the
//! canonical `{site}/questions/{id}` URL.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::{Qa2TexError, Result};

/// Site used when the caller does not pick one.
pub const DEFAULT_SITE: &str = "https://tex.stackexchange.com";

static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());
static PATH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/(?:[aq]|questions)/(\d+)(?:/.*)?$").unwrap());

/// A resolved question reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRef {
    /// Post ID as it appeared in the input.
    pub id: String,
    /// Canonical question URL.
    pub url: Url,
}

impl QuestionRef {
    /// Resolves `input` against `site`.
    ///
    /// # Errors
    ///
    /// [`Qa2TexError::InvalidUrl`] when `site` is not a URL, and
    /// [`Qa2TexError::InvalidQuestionRef`] when `input` is neither an ID nor a
    /// question link on `site`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qa2tex_core::QuestionRef;
    ///
    /// let q = QuestionRef::parse("https://tex.stackexchange.com/q/8/42", "https://tex.stackexchange.com").unwrap();
    /// assert_eq!(q.url.as_str(), "https://tex.stackexchange.com/questions/8");
    /// assert_eq!(q.file_stem(), "8");
    /// ```
    pub fn parse(input: &str, site: &str) -> Result<Self> {
        let site = Url::parse(site).map_err(|e| Qa2TexError::InvalidUrl(e.to_string()))?;
        let input = input.trim();

        if input.is_empty() {
            return Err(Qa2TexError::InvalidQuestionRef("no question ID or link given".to_string()));
        }

        let id = if ID_RE.is_match(input) {
            input.to_string()
        } else {
            let link = Url::parse(input).map_err(|_| Qa2TexError::InvalidQuestionRef(input.to_string()))?;
            if link.host_str() != site.host_str() {
                return Err(Qa2TexError::InvalidQuestionRef(format!(
                    "{input} is not a link to {}",
                    site.host_str().unwrap_or_default()
                )));
            }
            PATH_RE
                .captures(link.path())
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| Qa2TexError::InvalidQuestionRef(input.to_string()))?
        };

        let url = site
            .join(&format!("/questions/{id}"))
            .map_err(|e| Qa2TexError::InvalidUrl(e.to_string()))?;

        Ok(Self { id, url })
    }

    /// Base name for files generated from this question.
    pub fn file_stem(&self) -> &str {
        &self.id
    }
}
