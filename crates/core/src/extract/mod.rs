//! Question page extraction.
//!
//! [`QuestionExtractor`] turns a question page into a [`Question`]. Every
//! field is located through the ordered strategies of a [`Layout`], and the
//! [`FailurePolicy`] decides whether a missing field aborts the extraction
//! (the default) or is reported and defaulted.
//!
//! # Example
//!
//! ```rust,no_run
//! use qa2tex_core::{Document, ExtractConfig, QuestionExtractor};
//!
//! let html = std::fs::read_to_string("../../tests/fixtures/normal.html").unwrap();
//! let doc = Document::parse(&html).unwrap();
//! let question = QuestionExtractor::new(ExtractConfig::default()).extract(&doc).unwrap();
//! println!("{} ({} answers)", question.question.title, question.answers.len());
//! ```

mod answers;
mod author;
mod comments;
mod fields;
mod layout;

pub use fields::{FailurePolicy, FieldIssue};
pub use layout::{Layout, Pick, SelectorPath, Step, Strategies};

use serde::Serialize;
use tracing::{Span, error, info, info_span};

use self::author::{AnchorPick, PostKind, resolve_name, resolve_reputation};
use self::fields::Fields;
use crate::model::{AnswerOrder, Post, Question, User};
use crate::parse::{Document, Element};
use crate::{Qa2TexError, Result};

/// Configuration for question extraction.
///
/// # Example
///
/// ```rust
/// use qa2tex_core::{AnswerOrder, ExtractConfig, FailurePolicy};
///
/// let config = ExtractConfig::builder()
///     .answer_order(AnswerOrder::Votes)
///     .policy(FailurePolicy::Partial)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Where fields live on the page.
    pub layout: Layout,
    /// Presentation order applied to the answers.
    pub answer_order: AnswerOrder,
    /// Whether one failing field aborts the extraction.
    pub policy: FailurePolicy,
    /// HTTP settings used by [`QuestionExtractor::fetch`].
    #[cfg(feature = "fetch")]
    pub fetch: crate::fetch::FetchConfig,
    /// Parent span for every event the extractor emits.
    pub span: Span,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            answer_order: AnswerOrder::default(),
            policy: FailurePolicy::default(),
            #[cfg(feature = "fetch")]
            fetch: crate::fetch::FetchConfig::default(),
            span: info_span!("extract"),
        }
    }
}

impl ExtractConfig {
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder::new()
    }
}

/// Builder for ExtractConfig.
pub struct ExtractConfigBuilder {
    config: ExtractConfig,
}

impl ExtractConfigBuilder {
    pub fn new() -> Self {
        Self { config: ExtractConfig::default() }
    }

    /// Sets the selectors describing the page layout.
    pub fn layout(mut self, value: Layout) -> Self {
        self.config.layout = value;
        self
    }

    /// Sets the order answers are presented in.
    pub fn answer_order(mut self, value: AnswerOrder) -> Self {
        self.config.answer_order = value;
        self
    }

    /// Sets whether a missing field aborts extraction.
    pub fn policy(mut self, value: FailurePolicy) -> Self {
        self.config.policy = value;
        self
    }

    /// Sets the HTTP settings used by [`QuestionExtractor::fetch`].
    #[cfg(feature = "fetch")]
    pub fn fetch(mut self, value: crate::fetch::FetchConfig) -> Self {
        self.config.fetch = value;
        self
    }

    /// Sets the span extraction events are recorded under.
    pub fn span(mut self, value: Span) -> Self {
        self.config.span = value;
        self
    }

    pub fn build(self) -> ExtractConfig {
        self.config
    }
}

impl Default for ExtractConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The outcome of one extraction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    pub question: Question,
    /// Fields that were defaulted. Always empty under
    /// [`FailurePolicy::AbortOnError`].
    pub issues: Vec<FieldIssue>,
}

/// Extracts questions from question pages.
pub struct QuestionExtractor {
    config: ExtractConfig,
}

impl QuestionExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extracts a question from a parsed page.
    pub fn extract(&self, doc: &Document) -> Result<Question> {
        self.extract_document(doc).map(|extraction| extraction.question)
    }

    /// Extracts a question from a parsed page, keeping any recorded issues.
    ///
    /// Failures are logged here; callers only need to report them.
    pub fn extract_document(&self, doc: &Document) -> Result<Extraction> {
        self.read_page(doc).inspect_err(|err| self.log_failure(err))
    }

    /// Fetches `url` and extracts the question from it.
    ///
    /// A failure anywhere discards everything read so far; use
    /// `unwrap_or_default()` on the result for an empty question.
    #[cfg(feature = "fetch")]
    pub async fn fetch(&self, url: &str) -> Result<Extraction> {
        use tracing::Instrument;

        let span = &self.config.span;
        info!(parent: span, url, "fetching question");

        let result = async {
            let base_url = crate::fetch::parse_url(url)?;
            let html = crate::fetch::fetch_url(url, &self.config.fetch).await?;
            let doc = Document::parse_with_url(&html, base_url)?;
            self.read_page(&doc)
        }
        .instrument(span.clone())
        .await;

        result.inspect_err(|err| self.log_failure(err))
    }

    fn log_failure(&self, err: &Qa2TexError) {
        let span = &self.config.span;
        if err.is_transport() {
            error!(parent: span, error = %err, "could not fetch the question page (possibly a 404 page)");
        } else {
            error!(parent: span, error = %err, "could not extract the question data");
        }
    }

    fn read_page(&self, doc: &Document) -> Result<Extraction> {
        let span = &self.config.span;
        let layout = &self.config.layout;
        let root = doc.root();
        let mut fields = Fields::new(self.config.policy, span);

        info!(parent: span, "reading question");
        let question = self.read_question(root, &mut fields)?;

        let nodes = root.select(&layout.answer)?;
        info!(parent: span, answers = nodes.len(), "reading answers");

        let mut answers = Vec::with_capacity(nodes.len());
        for (index, node) in nodes.into_iter().enumerate() {
            answers.push(answers::extract_answer(node, index, layout, &mut fields, span)?);
        }

        let mut question = Question {
            question,
            answers,
            source_url: doc.base_url().map(|u| u.to_string()),
        };
        question.sort_answers(self.config.answer_order);

        Ok(Extraction { question, issues: fields.into_issues() })
    }

    fn read_question(&self, root: Element<'_>, fields: &mut Fields<'_>) -> Result<Post> {
        let layout = &self.config.layout;

        let title = fields.take(
            "question title",
            layout.title.resolve(root, "question title").map(|t| t.trimmed_text()),
        )?;
        let date = fields.take(
            "question date",
            layout.question_date.resolve(root, "question date").map(|d| d.trimmed_text()),
        )?;
        let body = fields.take(
            "question body",
            layout.body.resolve(root, "question body").map(|b| b.inner_html()),
        )?;
        let votes = fields.take("question votes", self.question_votes(root))?;
        let comments = fields.take(
            "question comments",
            layout
                .question_block
                .resolve(root, "question block")
                .and_then(|block| comments::extract_comments(block, layout, "question comments")),
        )?;
        let user = fields.take("question author", self.question_user(root))?;

        Ok(Post { title, date, body, votes, accepted: false, comments, user })
    }

    fn question_votes(&self, root: Element<'_>) -> Result<i32> {
        let layout = &self.config.layout;
        let block = layout.question_block.resolve(root, "question block")?;
        let container = layout.vote_container.resolve(block, "question voting container")?;
        parse_votes(&layout.vote_count.resolve(container, "question votes")?.text())
    }

    fn question_user(&self, root: Element<'_>) -> Result<User> {
        let layout = &self.config.layout;
        let name_element = layout.question_author.resolve(root, "question author")?;
        let block = layout.question_block.resolve(root, "question block")?;

        let name = resolve_name(name_element, AnchorPick::First)?;
        let reputation = resolve_reputation(block, name_element, PostKind::Question, layout)?;

        Ok(User { name, reputation })
    }
}

/// Parses vote text such as `42` or `-3`.
pub(crate) fn parse_votes(text: &str) -> Result<i32> {
    text.trim()
        .parse()
        .map_err(|_| Qa2TexError::InvalidVoteCount { text: text.trim().to_string() })
}

/// Extracts a question from an HTML string with default settings.
pub fn extract_question(html: &str) -> Result<Question> {
    let doc = Document::parse(html)?;
    QuestionExtractor::new(ExtractConfig::default()).extract(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reputation;

    fn page(question_sig: &str, marker: &str, votes: &str) -> String {
        format!(
            r#"<html><body>
            <div id="question-header"><h1><a href="/questions/1/t">Tabular spacing</a></h1></div>
            <div id="question">
              {marker}
              <div class="js-voting-container"><div class="js-vote-count">{votes}</div></div>
              <div class="post-text"><p>How?</p></div>
              {question_sig}
              <div class="comments"><ul>
                <li class="comment"><span class="comment-copy">Which class?</span>
                  <a class="comment-user" href="/u/9">zed</a><span class="comment-date">today</span></li>
              </ul></div>
            </div>
            </body></html>"#
        )
    }

    const OWNER_SIG: &str = r#"<div class="post-signature owner"><div class="user-info">
        <span class="relativetime">Feb 1 at 8:00</span>
        <div class="user-details"><a href="/users/1/alice">alice</a><span class="reputation-score">321</span></div>
    </div></div>"#;

    const GUEST_SIGS: &str = r#"<div class="post-signature"><div class="user-info">
        <span class="relativetime">Feb 2 at 9:00</span><div class="user-details">edited</div></div></div>
        <div class="post-signature"><div class="user-info">
        <div class="user-details">first</div><div class="user-details">guest42</div></div></div>"#;

    #[test]
    fn test_normal_question() {
        let question = extract_question(&page(OWNER_SIG, "", "42")).unwrap();
        let post = &question.question;

        assert_eq!(post.title, "Tabular spacing");
        assert_eq!(post.date, "Feb 1 at 8:00");
        assert_eq!(post.body, "<p>How?</p>");
        assert_eq!(post.votes, 42);
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.user.name, "alice");
        assert_eq!(post.user.reputation, Reputation::Score("321".into()));
        assert!(question.answers.is_empty());
    }

    #[test]
    fn test_non_numeric_votes_fail() {
        let result = extract_question(&page(OWNER_SIG, "", "abc"));
        assert!(matches!(result, Err(Qa2TexError::InvalidVoteCount { .. })));
    }

    #[test]
    fn test_community_wiki_wins_over_anchor() {
        let marker = r#"<span class="community-wiki">community wiki</span>"#;
        let question = extract_question(&page(OWNER_SIG, marker, "1")).unwrap();
        assert_eq!(question.question.user.name, "alice");
        assert_eq!(question.question.user.reputation, Reputation::CommunityWiki);
    }

    #[test]
    fn test_migrated_question_falls_back_to_second_signature() {
        let question = extract_question(&page(GUEST_SIGS, "", "0")).unwrap();
        let post = &question.question;

        assert_eq!(post.date, "Feb 2 at 9:00");
        assert_eq!(post.user.name, "guest42");
        assert_eq!(post.user.reputation, Reputation::MigratedQuestion);
    }

    #[test]
    fn test_partial_policy_reports_missing_title() {
        let html = page(OWNER_SIG, "", "5").replace("question-header", "other-header");
        let doc = Document::parse(&html).unwrap();
        let extractor = QuestionExtractor::new(ExtractConfig::builder().policy(FailurePolicy::Partial).build());

        let extraction = extractor.extract_document(&doc).unwrap();
        assert_eq!(extraction.question.question.title, "");
        assert_eq!(extraction.question.question.votes, 5);
        assert_eq!(extraction.issues.len(), 1);
        assert_eq!(extraction.issues[0].field, "question title");
    }

    #[test]
    fn test_parse_votes() {
        assert_eq!(parse_votes("42").unwrap(), 42);
        assert_eq!(parse_votes(" -3\n").unwrap(), -3);
        assert!(parse_votes("").is_err());
    }
}
