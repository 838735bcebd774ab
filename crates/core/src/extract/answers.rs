//! Answer extraction, one structural traversal per answer node.

use tracing::{Span, debug};

use super::author::answer_user;
use super::comments::extract_comments;
use super::fields::Fields;
use super::layout::Layout;
use super::parse_votes;
use crate::Result;
use crate::model::Post;
use crate::parse::Element;

/// Builds one answer post from its own node.
///
/// Author, date, body, votes and comments are all looked up inside `node`,
/// so a page that drops one block for some answer cannot shift fields
/// between answers.
pub(crate) fn extract_answer(
    node: Element<'_>, index: usize, layout: &Layout, fields: &mut Fields<'_>, span: &Span,
) -> Result<Post> {
    let n = index + 1;
    debug!(parent: span, answer = n, "reading answer");

    let user = fields.take(&format!("answer {n} author"), answer_user(node, layout))?;
    let date = fields.take(&format!("answer {n} date"), answer_date(node, layout))?;
    let body = fields.take(
        &format!("answer {n} body"),
        layout.body.resolve(node, "answer body").map(|b| b.inner_html()),
    )?;
    let (votes, accepted) = fields.take(&format!("answer {n} votes"), answer_votes(node, layout))?;
    let comments = fields.take(
        &format!("answer {n} comments"),
        extract_comments(node, layout, "answer comments"),
    )?;

    if accepted {
        debug!(parent: span, answer = n, "answer is accepted");
    }

    Ok(Post { title: String::new(), date, body, votes, accepted, comments, user })
}

fn answer_date(node: Element<'_>, layout: &Layout) -> Result<String> {
    let block = layout.answer_author_block.resolve(node, "answer author block")?;
    Ok(layout.answer_date.resolve(block, "answer date")?.trimmed_text())
}

fn answer_votes(node: Element<'_>, layout: &Layout) -> Result<(i32, bool)> {
    let container = layout.vote_container.resolve(node, "answer voting container")?;
    let votes = parse_votes(&layout.vote_count.resolve(container, "answer votes")?.text())?;
    let class_selector = format!(".{}", layout.accepted_class);
    let accepted = container.has_class(&layout.accepted_class) || container.contains(&class_selector)?;

    Ok((votes, accepted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Qa2TexError;
    use crate::extract::FailurePolicy;
    use crate::parse::Document;

    const ANSWER: &str = r#"
        <div class="answer" id="answer-2">
          <div class="js-voting-container">
            <div class="js-vote-count">7</div>
            <div class="js-accepted-answer-indicator vote-accepted-on"></div>
          </div>
          <div class="post-text"><p>Use <code>align</code>.</p></div>
          <div class="grid fw-wrap">
            <div class="post-signature">
              <div class="user-info">
                <span class="relativetime">Jan 5 '19 at 9:00</span>
                <div class="user-details"><a href="/users/3/erin">erin</a><span class="reputation-score">4,512</span></div>
              </div>
            </div>
          </div>
          <div class="comments"><ul></ul></div>
        </div>
    "#;

    fn answer_node(doc: &Document) -> Element<'_> {
        doc.select_first("div.answer").unwrap().unwrap()
    }

    #[test]
    fn test_extract_accepted_answer() {
        let doc = Document::parse(ANSWER).unwrap();
        let span = Span::none();
        let mut fields = Fields::new(FailurePolicy::AbortOnError, &span);

        let post = extract_answer(answer_node(&doc), 0, &Layout::default(), &mut fields, &span).unwrap();

        assert_eq!(post.title, "");
        assert_eq!(post.date, "Jan 5 '19 at 9:00");
        assert_eq!(post.body, "<p>Use <code>align</code>.</p>");
        assert_eq!(post.votes, 7);
        assert!(post.accepted);
        assert!(post.comments.is_empty());
        assert_eq!(post.user.name, "erin");
        assert_eq!(post.user.reputation.to_string(), "4,512");
    }

    #[test]
    fn test_unaccepted_answer() {
        let html = ANSWER.replace(" vote-accepted-on", "");
        let doc = Document::parse(&html).unwrap();
        let (votes, accepted) = answer_votes(answer_node(&doc), &Layout::default()).unwrap();
        assert_eq!(votes, 7);
        assert!(!accepted);
    }

    #[test]
    fn test_bad_votes_abort() {
        let html = ANSWER.replace(">7<", ">seven<");
        let doc = Document::parse(&html).unwrap();
        let span = Span::none();
        let mut fields = Fields::new(FailurePolicy::AbortOnError, &span);

        let result = extract_answer(answer_node(&doc), 0, &Layout::default(), &mut fields, &span);
        assert!(matches!(result, Err(Qa2TexError::InvalidVoteCount { .. })));
    }

    #[test]
    fn test_partial_policy_keeps_answer() {
        let html = ANSWER.replace(">7<", ">seven<");
        let doc = Document::parse(&html).unwrap();
        let span = Span::none();
        let mut fields = Fields::new(FailurePolicy::Partial, &span);

        let post = extract_answer(answer_node(&doc), 1, &Layout::default(), &mut fields, &span).unwrap();
        assert_eq!(post.votes, 0);
        assert!(!post.accepted);
        assert_eq!(post.user.name, "erin");

        let issues = fields.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "answer 2 votes");
    }
}
