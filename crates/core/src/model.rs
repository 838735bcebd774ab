//! The question/answers content model.
//!
//! A [`Question`] owns exactly one question [`Post`] and any number of answer
//! posts. Each post owns its [`User`] and its [`Comment`]s. Bodies stay as
//! HTML fragments; they are handed to the transpiler separately.

use std::cmp::Reverse;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::Result;

/// A question page: the question itself plus its answers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Question {
    /// The question post. Always present; empty when extraction failed.
    pub question: Post,

    /// Answer posts, ordered for presentation once extraction finishes.
    pub answers: Vec<Post>,

    /// Page the question was extracted from, if known.
    pub source_url: Option<String>,
}

impl Question {
    /// Reorders the answers according to `order`.
    pub fn sort_answers(&mut self, order: AnswerOrder) {
        order.sort(&mut self.answers);
    }

    /// Number of comments across the question and all answers.
    pub fn comment_count(&self) -> usize {
        self.question.comments.len() + self.answers.iter().map(|a| a.comments.len()).sum::<usize>()
    }

    /// Gets the question as structured JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// A question or answer with its metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Post {
    /// Title; only set on the question.
    pub title: String,
    /// Display date as shown on the page.
    pub date: String,
    /// Body as an HTML fragment.
    pub body: String,
    pub votes: i32,
    /// Whether this answer was accepted by the asker.
    pub accepted: bool,
    pub comments: Vec<Comment>,
    pub user: User,
}

/// The author of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct User {
    pub name: String,
    pub reputation: Reputation,
}

/// A comment attached to a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comment {
    /// Comment text as an HTML fragment.
    pub text: String,
    pub author: String,
    pub date: String,
    pub votes: i32,
}

/// What the page says about the author's standing.
///
/// Renders (and serializes) as the score text, `Community Wiki`,
/// `Migrated question`, `Migrated answer`, or an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Reputation {
    /// Reputation score exactly as displayed, e.g. `12.3k`.
    Score(String),
    CommunityWiki,
    MigratedQuestion,
    MigratedAnswer,
    /// The score element could not be read.
    #[default]
    Unknown,
}

impl fmt::Display for Reputation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reputation::Score(score) => f.write_str(score),
            Reputation::CommunityWiki => f.write_str("Community Wiki"),
            Reputation::MigratedQuestion => f.write_str("Migrated question"),
            Reputation::MigratedAnswer => f.write_str("Migrated answer"),
            Reputation::Unknown => Ok(()),
        }
    }
}

impl Serialize for Reputation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Presentation order for answers.
///
/// Sorting is stable, so ties keep document order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnswerOrder {
    /// Accepted answer first, then by votes, highest first.
    #[default]
    AcceptedThenVotes,
    /// By votes only, highest first.
    Votes,
    /// Document order.
    Document,
}

impl AnswerOrder {
    pub fn sort(self, answers: &mut [Post]) {
        match self {
            AnswerOrder::AcceptedThenVotes => answers.sort_by_key(|a| (Reverse(a.accepted), Reverse(a.votes))),
            AnswerOrder::Votes => answers.sort_by_key(|a| Reverse(a.votes)),
            AnswerOrder::Document => {}
        }
    }
}

impl std::str::FromStr for AnswerOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accepted" | "accepted-then-votes" => Ok(Self::AcceptedThenVotes),
            "votes" => Ok(Self::Votes),
            "document" | "page" => Ok(Self::Document),
            _ => Err(format!("Invalid answer order: {}. Valid options: accepted, votes, document", s)),
        }
    }
}
