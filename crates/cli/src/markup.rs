//! The `markup` output format: every post transpiled, each behind a `%`
//! comment header that LaTeX ignores.

use std::fmt::Write;

use qa2tex_core::{Comment, ImageResolver, Post, Question, Result, Transpiler};

pub async fn render<R: ImageResolver>(question: &Question, transpiler: &Transpiler<R>) -> Result<String> {
    let mut out = String::new();

    let post = &question.question;
    header(&mut out, &format!("Question: {}", post.title), post);
    if let Some(url) = &question.source_url {
        line(&mut out, &format!("Source: {url}"));
    }
    body(&mut out, post, transpiler).await?;

    for (i, answer) in question.answers.iter().enumerate() {
        let title = if answer.accepted { format!("Answer {} (accepted)", i + 1) } else { format!("Answer {}", i + 1) };
        out.push('\n');
        header(&mut out, &title, answer);
        body(&mut out, answer, transpiler).await?;
    }

    Ok(out)
}

fn line(out: &mut String, text: &str) {
    let _ = writeln!(out, "% {}", text.replace('\n', " "));
}

fn header(out: &mut String, title: &str, post: &Post) {
    line(out, title);

    let reputation = post.user.reputation.to_string();
    if reputation.is_empty() {
        line(out, &format!("Author: {}", post.user.name));
    } else {
        line(out, &format!("Author: {} ({})", post.user.name, reputation));
    }
    line(out, &format!("Date: {}", post.date));
    line(out, &format!("Votes: {}", post.votes));
}

async fn body<R: ImageResolver>(out: &mut String, post: &Post, transpiler: &Transpiler<R>) -> Result<()> {
    out.push_str(transpiler.transpile(&post.body).await?.trim());
    out.push('\n');

    for comment in &post.comments {
        comment_block(out, comment, transpiler).await?;
    }
    Ok(())
}

async fn comment_block<R: ImageResolver>(out: &mut String, comment: &Comment, transpiler: &Transpiler<R>) -> Result<()> {
    out.push('\n');
    line(out, &format!("Comment by {} on {} ({} votes)", comment.author, comment.date, comment.votes));
    out.push_str(transpiler.transpile(&comment.text).await?.trim());
    out.push('\n');
    Ok(())
}
