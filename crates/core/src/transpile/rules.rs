//! Ordered tag-to-LaTeX substitutions.
//!
//! The table is applied top to bottom over the whole fragment, so more
//! specific patterns (`<pre><code>`) must precede the general ones they
//! overlap (`<pre>`, `<code>`). Nesting is not validated.

use regex::{NoExpand, Regex};

use crate::{Qa2TexError, Result};

/// One textual substitution.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    replacement: String,
    expand: bool,
}

impl Rule {
    /// A case-insensitive pattern and its literal replacement.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self { pattern: compile(pattern)?, replacement: replacement.to_string(), expand: false })
    }

    /// A case-insensitive pattern whose replacement may refer to capture
    /// groups as `${1}`.
    pub fn template(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self { pattern: compile(pattern)?, replacement: replacement.to_string(), expand: true })
    }

    pub fn apply(&self, text: &str) -> String {
        if self.expand {
            self.pattern.replace_all(text, self.replacement.as_str()).into_owned()
        } else {
            self.pattern.replace_all(text, NoExpand(&self.replacement)).into_owned()
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("(?i){pattern}"))
        .map_err(|e| Qa2TexError::RewriteError(format!("Invalid rule pattern {pattern:?}: {e}")))
}

/// Substitutions applied in order.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The StackExchange post table, with code blocks placed in
    /// `listing_env`.
    pub fn stackexchange(listing_env: &str) -> Result<Self> {
        let begin = format!("\\begin{{{listing_env}}}\n");
        let end = format!("\\end{{{listing_env}}}\n");
        let end_block = format!("{end}\n");

        let mut table = Self::new();
        table
            .push_template(r#"(<[a-z][a-z0-9]*\b[^<>]*?")\s*/>"#, "${1} />")?
            .push_template(r#"(<[a-z][a-z0-9]*\b[^<>]*?")\s+>"#, "${1}>")?
            .push(r"<h1(?:\s[^>]*)?>", r"\subsubsubsection*{")?
            .push(r"</h1>", "}")?
            .push(r"<h2(?:\s[^>]*)?>", r"\paragraph*{")?
            .push(r"</h2>", "}")?
            .push(r"<h3(?:\s[^>]*)?>", r"\par\emph{")?
            .push(r"</h3>", "} -- ")?
            .push(r"<(?:b|strong)(?:\s[^>]*)?>", r"\textbf{")?
            .push(r"</(?:b|strong)>", "}")?
            .push(r"<i(?:\s[^>]*)?>", r"\textit{")?
            .push(r"</i>", "}")?
            .push(r"<em(?:\s[^>]*)?>", r"\emph{")?
            .push(r"</em>", "}")?
            .push(r"<pre(?:\s[^>]*)?>\s*<code(?:\s[^>]*)?>", &begin)?
            .push(r"</code>\s*</pre>", &end_block)?
            .push(r"<pre(?:\s[^>]*)?>", &begin)?
            .push(r"</pre>", &end)?
            .push(r"<code(?:\s[^>]*)?>", r"\lstinline|")?
            .push(r"</code>", "|")?
            .push(r#"<font\s+face="Courier"\s*>"#, r"\lstinline|")?
            .push(r"</font>", "|")?
            .push(r"<p(?:\s[^>]*)?>", "")?
            .push(r"</p>", "\n\n")?
            .push(r"<ol(?:\s[^>]*)?>", "\\begin{enumerate}\n")?
            .push(r"</ol>", "\\end{enumerate}\n")?
            .push(r"<ul(?:\s[^>]*)?>", "\\begin{itemize}\n")?
            .push(r"</ul>", "\\end{itemize}\n")?
            .push(r"<li(?:\s[^>]*)?>", r"\item ")?
            .push(r"</li>", "\n")?
            .push(r"<blockquote(?:\s[^>]*)?>", "\\begin{quotation}\n")?
            .push(r"</blockquote>", "\\end{quotation}\n")?
            .push(r"<br\s*/?>", "\n")?
            .push(r"<hr\s*/?>", r"\par\hrulefill\par")?;

        Ok(table)
    }

    /// Appends a rule; it runs after every rule already in the table.
    pub fn push(&mut self, pattern: &str, replacement: &str) -> Result<&mut Self> {
        self.rules.push(Rule::new(pattern, replacement)?);
        Ok(self)
    }

    /// Appends a [`Rule::template`] rule.
    pub fn push_template(&mut self, pattern: &str, replacement: &str) -> Result<&mut Self> {
        self.rules.push(Rule::template(pattern, replacement)?);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        self.rules.iter().fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }
}
