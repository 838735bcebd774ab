//! Comment list extraction.

use super::layout::Layout;
use crate::Result;
use crate::model::Comment;
use crate::parse::Element;

/// Reads every comment under `post_scope`, in document order.
///
/// The comment container must exist; an empty container yields no comments.
/// Comment votes default to zero because the page omits the count for
/// comments nobody upvoted.
pub(crate) fn extract_comments(post_scope: Element<'_>, layout: &Layout, field: &str) -> Result<Vec<Comment>> {
    let list = layout.comment_list.resolve(post_scope, field)?;

    list.select(&layout.comment)?
        .into_iter()
        .map(|item| extract_comment(item, layout))
        .collect()
}

fn extract_comment(item: Element<'_>, layout: &Layout) -> Result<Comment> {
    let text = layout.comment_text.resolve(item, "comment text")?.inner_html();
    let author = layout.comment_author.resolve(item, "comment author")?.trimmed_text();
    let date = layout.comment_date.resolve(item, "comment date")?.trimmed_text();
    let votes = layout
        .comment_votes
        .try_resolve(item)?
        .and_then(|cool| cool.trimmed_text().parse().ok())
        .unwrap_or(0);

    Ok(Comment { text, author, date, votes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Qa2TexError;
    use crate::parse::Document;

    const COMMENTS: &str = r#"
        <div class="post">
          <div class="comments">
            <ul>
              <li class="comment">
                <span class="cool">3</span>
                <span class="comment-copy">Try <code>\centering</code> instead.</span>
                <a class="comment-user" href="/users/1">alice</a>
                <span class="comment-date">Mar 2 at 10:00</span>
              </li>
              <li class="comment">
                <span class="comment-copy">Thanks!</span>
                <span class="comment-user">guest</span>
                <span class="comment-date">Mar 3 at 11:00</span>
              </li>
              <li class="comment">
                <span class="cool">n/a</span>
                <span class="comment-copy">Odd count.</span>
                <a class="comment-user" href="/users/2">bob</a>
                <span class="comment-date">Mar 4 at 12:00</span>
              </li>
            </ul>
          </div>
        </div>
    "#;

    #[test]
    fn test_extract_comments() {
        let doc = Document::parse(COMMENTS).unwrap();
        let post = doc.select_first("div.post").unwrap().unwrap();
        let comments = extract_comments(post, &Layout::default(), "comments").unwrap();

        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0].text, "Try <code>\\centering</code> instead.");
        assert_eq!(comments[0].author, "alice");
        assert_eq!(comments[0].date, "Mar 2 at 10:00");
        assert_eq!(comments[0].votes, 3);
    }

    #[test]
    fn test_comment_author_fallback_and_vote_default() {
        let doc = Document::parse(COMMENTS).unwrap();
        let post = doc.select_first("div.post").unwrap().unwrap();
        let comments = extract_comments(post, &Layout::default(), "comments").unwrap();

        assert_eq!(comments[1].author, "guest");
        assert_eq!(comments[1].votes, 0);
        assert_eq!(comments[2].votes, 0);
    }

    #[test]
    fn test_empty_comment_list() {
        let doc = Document::parse(r#"<div class="post"><div class="comments"><ul></ul></div></div>"#).unwrap();
        let post = doc.select_first("div.post").unwrap().unwrap();
        assert!(extract_comments(post, &Layout::default(), "comments").unwrap().is_empty());
    }

    #[test]
    fn test_missing_comment_container() {
        let doc = Document::parse(r#"<div class="post"></div>"#).unwrap();
        let post = doc.select_first("div.post").unwrap().unwrap();
        let result = extract_comments(post, &Layout::default(), "question comments");
        assert!(matches!(result, Err(Qa2TexError::MissingElement { .. })));
    }
}
