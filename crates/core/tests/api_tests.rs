//! Library API integration tests
use qa2tex_core::*;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn load(name: &str) -> Document {
    let html = std::fs::read_to_string(get_fixture_path(name)).unwrap();
    Document::parse(&html).unwrap()
}

fn extract(name: &str) -> Result<Question> {
    QuestionExtractor::new(ExtractConfig::default()).extract(&load(name))
}

#[test]
fn test_extract_normal_question() {
    let question = extract("normal.html").expect("should extract");
    let post = &question.question;

    assert_eq!(post.title, "Align columns on the decimal point");
    assert_eq!(post.date, "Jan 2 '19 at 8:30");
    assert_eq!(post.votes, 42);
    assert_eq!(post.comments.len(), 2);
    assert_eq!(post.user.name, "alice");
    assert_eq!(post.user.reputation, Reputation::Score("1,234".into()));
    assert!(post.body.contains("<code>tabular</code>"));

    assert_eq!(question.answers.len(), 2);
    assert_eq!(question.comment_count(), 3);
}

#[test]
fn test_question_comments() {
    let question = extract("normal.html").unwrap();
    let comments = &question.question.comments;

    assert_eq!(comments[0].text, "Have you tried the <code>S</code> column type?");
    assert_eq!(comments[0].author, "bob");
    assert_eq!(comments[0].date, "Jan 2 '19 at 9:00");
    assert_eq!(comments[0].votes, 5);

    assert_eq!(comments[1].author, "user42");
    assert_eq!(comments[1].votes, 0);
}

#[test]
fn test_accepted_answer_first() {
    let question = extract("normal.html").unwrap();
    let accepted = &question.answers[0];
    let other = &question.answers[1];

    assert!(accepted.accepted);
    assert_eq!(accepted.votes, 3);
    assert_eq!(accepted.date, "Jan 3 '19 at 12:00");
    assert_eq!(accepted.user.name, "Carol & Co");
    assert_eq!(accepted.user.reputation, Reputation::Score("45.7k".into()));
    assert!(accepted.comments.is_empty());
    assert!(accepted.title.is_empty());

    assert!(!other.accepted);
    assert_eq!(other.votes, 10);
    assert_eq!(other.user.name, "bob");
    assert_eq!(other.comments.len(), 1);
    assert_eq!(other.comments[0].author, "alice");
}

#[test]
fn test_answer_order_policies() {
    let doc = load("normal.html");

    let by_votes = ExtractConfig::builder().answer_order(AnswerOrder::Votes).build();
    let question = QuestionExtractor::new(by_votes).extract(&doc).unwrap();
    let votes: Vec<i32> = question.answers.iter().map(|a| a.votes).collect();
    assert_eq!(votes, vec![10, 3]);

    let in_page = ExtractConfig::builder().answer_order(AnswerOrder::Document).build();
    let question = QuestionExtractor::new(in_page).extract(&doc).unwrap();
    assert_eq!(question.answers[0].user.name, "bob");
}

#[test]
fn test_non_numeric_votes_abort() {
    let result = extract("bad_votes.html");
    assert!(matches!(result, Err(Qa2TexError::InvalidVoteCount { ref text }) if text == "abc"));
    assert!(result.unwrap_or_default().answers.is_empty());
}

#[test]
fn test_non_numeric_votes_partial() {
    let config = ExtractConfig::builder().policy(FailurePolicy::Partial).build();
    let extraction = QuestionExtractor::new(config).extract_document(&load("bad_votes.html")).unwrap();

    assert_eq!(extraction.question.question.votes, 0);
    assert_eq!(extraction.question.question.title, "Align columns on the decimal point");
    assert_eq!(extraction.question.answers.len(), 2);
    assert_eq!(extraction.issues.len(), 1);
    assert_eq!(extraction.issues[0].field, "question votes");
}

#[test]
fn test_community_wiki() {
    let question = extract("community_wiki.html").unwrap();

    assert_eq!(question.question.user.name, "alice");
    assert_eq!(question.question.user.reputation, Reputation::CommunityWiki);

    let wiki_answer = question.answers.iter().find(|a| !a.accepted).unwrap();
    assert_eq!(wiki_answer.user.name, "bob");
    assert_eq!(wiki_answer.user.reputation, Reputation::CommunityWiki);
    assert_eq!(wiki_answer.date, "Jan 2 '19 at 11:00");
}

#[test]
fn test_migrated_posts() {
    let question = extract("migrated.html").unwrap();

    assert_eq!(question.question.user.name, "migrated-user");
    assert_eq!(question.question.user.reputation, Reputation::MigratedQuestion);
    assert_eq!(question.question.user.reputation.to_string(), "Migrated question");
    assert_eq!(question.question.date, "Jan 3 '19 at 10:00");

    let migrated = question.answers.iter().find(|a| !a.accepted).unwrap();
    assert_eq!(migrated.user.name, "guest-bob");
    assert_eq!(migrated.user.reputation, Reputation::MigratedAnswer);
}

#[test]
fn test_missing_layout_is_an_error() {
    let doc = Document::parse("<html><body><p>Not a question page</p></body></html>").unwrap();
    let result = QuestionExtractor::new(ExtractConfig::default()).extract(&doc);
    assert!(matches!(result, Err(Qa2TexError::MissingElement { .. })));
}

#[test]
fn test_question_to_json() {
    let question = extract("normal.html").unwrap();
    let json = question.to_json().unwrap();

    assert!(json.is_object());
    assert_eq!(json["question"]["votes"], 42);
    assert_eq!(json["question"]["user"]["reputation"], "1,234");
    assert_eq!(json["answers"].as_array().unwrap().len(), 2);
}

#[test]
fn test_question_ref_api() {
    let by_id = QuestionRef::parse("2", DEFAULT_SITE).unwrap();
    let by_url = QuestionRef::parse("https://tex.stackexchange.com/q/2", DEFAULT_SITE).unwrap();

    assert_eq!(by_id, by_url);
    assert_eq!(by_id.url.as_str(), "https://tex.stackexchange.com/questions/2");
    assert!(QuestionRef::parse("https://example.com/q/2", DEFAULT_SITE).is_err());
}

#[tokio::test]
async fn test_transpile_accepted_answer() {
    let question = extract("normal.html").unwrap();
    let transpiler = Transpiler::new(TranspileConfig::default(), OfflineResolver).unwrap();

    let latex = transpiler.transpile(&question.answers[0].body).await.unwrap();

    assert!(latex.contains("With \\lstinline|siunitx|:"));
    assert!(latex.contains("\\begin{lstlisting}\n\\begin{tabular}{S[table-format=2.2]}"));
    assert!(latex.contains("\\end{tabular}\n\\end{lstlisting}"));
    assert!(latex.contains("\\includegraphics[scale=0.5]{example-image.pdf}\n\\caption{Aligned columns}"));
    assert!(!latex.contains("\\href"));
    assert!(!latex.contains('<'));
}

#[tokio::test]
async fn test_transpile_question_body() {
    let question = extract("normal.html").unwrap();
    let transpiler = Transpiler::new(TranspileConfig::default(), OfflineResolver).unwrap();

    let latex = transpiler.transpile(&question.question.body).await.unwrap();

    assert!(latex.contains("\\textbf{3.14} and \\emph{-12.5}."));
    assert!(latex.contains("\\href{https://ctan.org/pkg/siunitx}{siunitx}"));
}
