//! Page layout as data.
//!
//! Every field the extractor reads is located through a [`Strategies`] list:
//! ordered [`SelectorPath`]s tried one after another until one resolves.
//! Community-wiki and migrated posts omit some of the markup normal posts
//! carry, so most fields have a primary path and a fallback.

use std::fmt;

use crate::parse::Element;
use crate::{Qa2TexError, Result};

/// Which match of a selector a path step keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    First,
    Last,
    Nth(usize),
}

/// One hop of a [`SelectorPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub selector: String,
    pub pick: Pick,
}

/// A chain of selections, each scoped to the element the previous one
/// picked.
///
/// ```rust
/// use qa2tex_core::extract::SelectorPath;
///
/// let path = SelectorPath::nth(".post-signature", 1).then_nth("div.user-details", 1);
/// assert_eq!(path.to_string(), ".post-signature[1] > div.user-details[1]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorPath {
    steps: Vec<Step>,
}

impl SelectorPath {
    pub fn first(selector: &str) -> Self {
        Self { steps: vec![] }.then(selector, Pick::First)
    }

    pub fn last(selector: &str) -> Self {
        Self { steps: vec![] }.then(selector, Pick::Last)
    }

    pub fn nth(selector: &str, index: usize) -> Self {
        Self { steps: vec![] }.then(selector, Pick::Nth(index))
    }

    pub fn then_first(self, selector: &str) -> Self {
        self.then(selector, Pick::First)
    }

    pub fn then_last(self, selector: &str) -> Self {
        self.then(selector, Pick::Last)
    }

    pub fn then_nth(self, selector: &str, index: usize) -> Self {
        self.then(selector, Pick::Nth(index))
    }

    fn then(mut self, selector: &str, pick: Pick) -> Self {
        self.steps.push(Step { selector: selector.to_string(), pick });
        self
    }

    /// Follows the path from `scope`.
    ///
    /// `Ok(None)` means some step matched nothing; an invalid selector is an
    /// error.
    pub fn resolve<'a>(&self, scope: Element<'a>) -> Result<Option<Element<'a>>> {
        let mut current = scope;
        for step in &self.steps {
            let next = match step.pick {
                Pick::First => current.select_first(&step.selector)?,
                Pick::Last => current.select_last(&step.selector)?,
                Pick::Nth(index) => current.select_nth(&step.selector, index)?,
            };
            match next {
                Some(element) => current = element,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

impl fmt::Display for SelectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            f.write_str(&step.selector)?;
            match step.pick {
                Pick::First => {}
                Pick::Last => f.write_str("[last]")?,
                Pick::Nth(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Ordered fallbacks for one field. The first path that resolves wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategies(Vec<SelectorPath>);

impl Strategies {
    pub fn new(paths: Vec<SelectorPath>) -> Self {
        Self(paths)
    }

    pub fn single(path: SelectorPath) -> Self {
        Self(vec![path])
    }

    pub fn paths(&self) -> &[SelectorPath] {
        &self.0
    }

    /// Resolves the first matching path, or `None` when all miss.
    pub fn try_resolve<'a>(&self, scope: Element<'a>) -> Result<Option<Element<'a>>> {
        for path in &self.0 {
            if let Some(element) = path.resolve(scope)? {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    /// Resolves the first matching path.
    ///
    /// # Errors
    ///
    /// [`Qa2TexError::MissingElement`] naming `field` when every path misses.
    pub fn resolve<'a>(&self, scope: Element<'a>, field: &str) -> Result<Element<'a>> {
        self.try_resolve(scope)?.ok_or_else(|| Qa2TexError::missing(field, self.to_string()))
    }
}

impl fmt::Display for Strategies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{path}")?;
        }
        Ok(())
    }
}

/// Where each field lives on a question page.
///
/// `Default` is the StackExchange layout. Question-level fields are searched
/// from the document root; answer-level fields from each answer node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub title: Strategies,
    pub question_date: Strategies,
    /// Block holding the question's voting container and community-wiki marker.
    pub question_block: Strategies,
    /// Element holding the asker's name and reputation.
    pub question_author: Strategies,
    pub body: Strategies,
    pub vote_container: Strategies,
    pub vote_count: Strategies,
    /// Class the voting container carries (on itself or a child) when the answer is accepted.
    pub accepted_class: String,
    pub community_wiki: String,
    pub reputation_score: String,
    pub answer: String,
    pub answer_author_block: Strategies,
    pub user_details: String,
    pub answer_date: Strategies,
    pub comment_list: Strategies,
    pub comment: String,
    pub comment_text: Strategies,
    pub comment_author: Strategies,
    pub comment_date: Strategies,
    pub comment_votes: Strategies,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            title: Strategies::single(
                SelectorPath::first("div#question-header")
                    .then_first("h1")
                    .then_first("a"),
            ),
            question_date: Strategies::new(vec![
                SelectorPath::first(".post-signature.owner").then_first("span.relativetime"),
                SelectorPath::first(".post-signature").then_first("span.relativetime"),
            ]),
            question_block: Strategies::single(SelectorPath::first("div#question")),
            question_author: Strategies::new(vec![
                SelectorPath::first(".post-signature.owner").then_first("div.user-details"),
                SelectorPath::nth(".post-signature", 1).then_nth("div.user-details", 1),
            ]),
            body: Strategies::new(vec![
                SelectorPath::first("div.post-text"),
                SelectorPath::first("div.js-post-body"),
            ]),
            vote_container: Strategies::single(SelectorPath::first("div.js-voting-container")),
            vote_count: Strategies::single(SelectorPath::first("div.js-vote-count")),
            accepted_class: "vote-accepted-on".to_string(),
            community_wiki: "span.community-wiki".to_string(),
            reputation_score: "span.reputation-score".to_string(),
            answer: "div.answer".to_string(),
            answer_author_block: Strategies::single(SelectorPath::first("div.fw-wrap")),
            user_details: "div.user-details".to_string(),
            answer_date: Strategies::single(SelectorPath::first("div.user-info span.relativetime")),
            comment_list: Strategies::single(SelectorPath::first("div.comments")),
            comment: "li.comment".to_string(),
            comment_text: Strategies::single(SelectorPath::first("span.comment-copy")),
            comment_author: Strategies::new(vec![
                SelectorPath::first("a.comment-user"),
                SelectorPath::first("span.comment-user"),
                SelectorPath::first(".comment-user"),
            ]),
            comment_date: Strategies::single(SelectorPath::first("span.comment-date")),
            comment_votes: Strategies::single(SelectorPath::first("span.cool")),
        }
    }
}
