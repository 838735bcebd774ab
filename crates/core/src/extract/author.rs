//! Author name and reputation resolution.

use std::sync::LazyLock;

use regex::Regex;

use super::layout::Layout;
use crate::model::{Reputation, User};
use crate::parse::Element;
use crate::{Qa2TexError, Result};

/// Decorated names (moderators, badges) embed an image before the name.
static IMAGE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<img\b[^>]*>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostKind {
    Question,
    Answer,
}

/// Which anchor of the name element carries the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnchorPick {
    First,
    /// Community-wiki signatures list revision links before the author.
    Last,
}

/// Reads a display name from a user-details element.
///
/// The chosen anchor's markup wins when it embeds an image marker (the name
/// is whatever follows it); otherwise its text. Without any anchor the
/// element's own text is used.
pub(crate) fn resolve_name(name_element: Element<'_>, pick: AnchorPick) -> Result<String> {
    let anchors = name_element.anchors()?;
    let anchor = match pick {
        AnchorPick::First => anchors.first(),
        AnchorPick::Last => anchors.last(),
    };

    let name = match anchor {
        Some(anchor) => {
            let markup = anchor.inner_html();
            match strip_marker(&markup) {
                Some(rest) => html_escape::decode_html_entities(rest).into_owned(),
                None => anchor.text(),
            }
        }
        None => name_element.text(),
    };

    Ok(name.trim().to_string())
}

/// The substring after the last embedded image marker, if there is one.
fn strip_marker(markup: &str) -> Option<&str> {
    IMAGE_MARKER.find_iter(markup).last().map(|m| &markup[m.end()..])
}

/// Applies the reputation rules in priority order: community-wiki marker,
/// then missing profile link (migrated post), then the score text.
pub(crate) fn resolve_reputation(
    post_scope: Element<'_>, name_element: Element<'_>, kind: PostKind, layout: &Layout,
) -> Result<Reputation> {
    if post_scope.contains(&layout.community_wiki)? {
        return Ok(Reputation::CommunityWiki);
    }

    if name_element.anchors()?.is_empty() {
        return Ok(match kind {
            PostKind::Question => Reputation::MigratedQuestion,
            PostKind::Answer => Reputation::MigratedAnswer,
        });
    }

    Ok(name_element
        .select_first(&layout.reputation_score)?
        .map(|score| score.trimmed_text())
        .filter(|score| !score.is_empty())
        .map_or(Reputation::Unknown, Reputation::Score))
}

/// Resolves the answer author from its author block.
///
/// The name comes from the last user-details element. When the first one
/// holds no link the post is community-maintained and the author is that
/// element's last link.
pub(crate) fn answer_user(answer: Element<'_>, layout: &Layout) -> Result<User> {
    let block = layout.answer_author_block.resolve(answer, "answer author block")?;
    let details = block.select(&layout.user_details)?;

    let (Some(first), Some(last)) = (details.first(), details.last()) else {
        return Err(Qa2TexError::missing("answer author", layout.user_details.clone()));
    };

    let pick = if first.anchors()?.is_empty() { AnchorPick::Last } else { AnchorPick::First };
    let name = resolve_name(*last, pick)?;
    let reputation = resolve_reputation(answer, *last, PostKind::Answer, layout)?;

    Ok(User { name, reputation })
}
