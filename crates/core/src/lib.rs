pub mod error;
pub mod extract;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod model;
pub mod parse;
pub mod question_ref;
pub mod resolve;
pub mod transpile;

pub use error::{Qa2TexError, Result};
pub use extract::{
    ExtractConfig, ExtractConfigBuilder, Extraction, FailurePolicy, FieldIssue, Layout, QuestionExtractor,
    extract_question,
};
#[cfg(feature = "fetch")]
pub use fetch::FetchConfig;
#[cfg(feature = "fetch")]
pub use fetch::{fetch_file, fetch_stdin, fetch_url};
pub use model::{AnswerOrder, Comment, Post, Question, Reputation, User};
pub use parse::{Document, Element};
pub use question_ref::{DEFAULT_SITE, QuestionRef};
#[cfg(feature = "fetch")]
pub use resolve::HttpImageResolver;
pub use resolve::{ImageResolver, OfflineResolver};
pub use transpile::{PLACEHOLDER_IMAGE, RuleTable, TranspileConfig, TranspileConfigBuilder, Transpiler};
