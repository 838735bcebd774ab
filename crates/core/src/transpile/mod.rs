//! HTML post bodies to LaTeX.
//!
//! [`Transpiler::transpile`] runs one rewriter pass that swaps links and
//! images for placeholders, applies the [`RuleTable`], renders links,
//! resolves each image through an [`ImageResolver`] and finally decodes
//! character entities. A failed image download never fails the call: the
//! figure references the placeholder image instead.
//!
//! # Example
//!
//! ```rust
//! use qa2tex_core::{OfflineResolver, TranspileConfig, Transpiler};
//!
//! # tokio_test_block(async {
//! let transpiler = Transpiler::new(TranspileConfig::default(), OfflineResolver).unwrap();
//! let latex = transpiler.transpile("<p>Use <b>bold</b> &amp; more</p>").await.unwrap();
//! assert_eq!(latex, "Use \\textbf{bold} & more\n\n");
//! # });
//! # fn tokio_test_block<F: std::future::Future<Output = ()>>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod figure;
mod rules;
mod tokens;

pub use figure::has_caption;
pub use rules::{Rule, RuleTable};
pub use tokens::{ImageGroup, LinkGroup};

use std::path::PathBuf;

use tracing::{Span, debug, info_span, warn};
use url::Url;

use crate::Result;
use crate::question_ref::DEFAULT_SITE;
use crate::resolve::ImageResolver;

/// Image referenced when a download fails.
pub const PLACEHOLDER_IMAGE: &str = "example-image.pdf";

/// Configuration for the transpiler.
#[derive(Debug, Clone)]
pub struct TranspileConfig {
    /// Base for relative `href`/`src` attributes.
    pub base_url: Url,
    /// Directory the images land in. Figures reference images by their
    /// path relative to the LaTeX file, so this is usually relative too.
    pub output_dir: PathBuf,
    /// File referenced by figures whose image could not be stored.
    pub placeholder_image: String,
    /// Environment wrapping code blocks.
    pub listing_env: String,
    /// `scale` option of `\includegraphics`.
    pub figure_scale: f32,
    pub span: Span,
}

impl Default for TranspileConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            output_dir: PathBuf::from("."),
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
            listing_env: "lstlisting".to_string(),
            figure_scale: 0.5,
            span: info_span!("transpile"),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_SITE).unwrap_or_else(|_| unreachable!("default site is a valid URL"))
}

impl TranspileConfig {
    pub fn builder() -> TranspileConfigBuilder {
        TranspileConfigBuilder::new()
    }
}

/// Builder for TranspileConfig.
pub struct TranspileConfigBuilder {
    config: TranspileConfig,
}

impl TranspileConfigBuilder {
    pub fn new() -> Self {
        Self { config: TranspileConfig::default() }
    }

    /// Sets the base for relative `href`/`src` attributes.
    pub fn base_url(mut self, value: Url) -> Self {
        self.config.base_url = value;
        self
    }

    /// Sets the directory images are written to and referenced from.
    pub fn output_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.config.output_dir = value.into();
        self
    }

    /// Sets the file referenced when an image cannot be stored.
    pub fn placeholder_image(mut self, value: impl Into<String>) -> Self {
        self.config.placeholder_image = value.into();
        self
    }

    /// Sets the environment wrapping code blocks.
    pub fn listing_env(mut self, value: impl Into<String>) -> Self {
        self.config.listing_env = value.into();
        self
    }

    /// Sets the `scale` option of `\includegraphics`.
    pub fn figure_scale(mut self, value: f32) -> Self {
        self.config.figure_scale = value;
        self
    }

    /// Sets the span transpiler events are recorded under.
    pub fn span(mut self, value: Span) -> Self {
        self.config.span = value;
        self
    }

    pub fn build(self) -> TranspileConfig {
        self.config
    }
}

impl Default for TranspileConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts post bodies to LaTeX, storing images through `R`.
pub struct Transpiler<R> {
    config: TranspileConfig,
    rules: RuleTable,
    resolver: R,
}

impl<R: ImageResolver> Transpiler<R> {
    /// Builds a transpiler with the StackExchange rule table.
    pub fn new(config: TranspileConfig, resolver: R) -> Result<Self> {
        let rules = RuleTable::stackexchange(&config.listing_env)?;
        Ok(Self::with_rules(config, rules, resolver))
    }

    pub fn with_rules(config: TranspileConfig, rules: RuleTable, resolver: R) -> Self {
        Self { config, rules, resolver }
    }

    pub fn config(&self) -> &TranspileConfig {
        &self.config
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Converts one HTML fragment to LaTeX.
    ///
    /// # Errors
    ///
    /// Only rewriter failures. Image failures are logged and replaced by
    /// the placeholder image.
    pub async fn transpile(&self, html: &str) -> Result<String> {
        let span = &self.config.span;
        let tokenized = tokens::tokenize(html, &self.config.base_url)?;
        debug!(
            parent: span,
            images = tokenized.images.len(),
            links = tokenized.links.len(),
            "tokenized fragment"
        );

        let linked = tokens::render_links(&tokenized.markup, &tokenized.links);
        let markup = self.rules.apply(&linked);

        let mut names = Vec::with_capacity(tokenized.images.len());
        for image in &tokenized.images {
            names.push(self.materialize(image).await);
        }

        let scale = self.config.figure_scale;
        let rendered = tokens::render_images(&markup, |index| match tokenized.images.get(index) {
            Some(image) => figure::render(&names[index], &image.alt, scale),
            None => String::new(),
        });

        Ok(html_escape::decode_html_entities(&rendered).into_owned())
    }

    /// The path a figure should reference for `image`.
    async fn materialize(&self, image: &ImageGroup) -> String {
        let span = &self.config.span;
        let (Some(url), Some(name)) = (&image.url, &image.name) else {
            warn!(parent: span, alt = %image.alt, "image source cannot be resolved, using placeholder");
            return self.config.placeholder_image.clone();
        };

        let dest = self.config.output_dir.join(name);
        match self.resolver.resolve(url, &dest).await {
            Ok(()) => {
                debug!(parent: span, %url, path = %dest.display(), "image stored");
                self.figure_path(name)
            }
            Err(err) => {
                warn!(parent: span, %url, error = %err, "image download failed, using placeholder");
                self.config.placeholder_image.clone()
            }
        }
    }

    /// `name` inside the output directory, with `/` separators as LaTeX expects.
    fn figure_path(&self, name: &str) -> String {
        let dir = self.config.output_dir.to_string_lossy().replace('\\', "/");
        let dir = dir.trim_end_matches('/');
        if dir.is_empty() || dir == "." { name.to_string() } else { format!("{dir}/{name}") }
    }
}
