mod echo;
mod markup;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use qa2tex_core::{
    AnswerOrder, Document, ExtractConfig, Extraction, FailurePolicy, FetchConfig, HttpImageResolver, ImageResolver,
    OfflineResolver, Question, QuestionExtractor, QuestionRef, TranspileConfig, Transpiler, DEFAULT_SITE,
    fetch_file, fetch_stdin,
};
use tracing_subscriber::EnvFilter;
use url::Url;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the extracted question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Markup,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markup" | "latex" | "tex" => Ok(Self::Markup),
            _ => Err(format!("Invalid format: {}. Valid options: json, markup", s)),
        }
    }
}

/// Extract a StackExchange question with its answers and comments, and
/// turn the posts into LaTeX
#[derive(Parser, Debug)]
#[command(name = "qa2tex")]
#[command(author = "qa2tex Contributors")]
#[command(version = VERSION)]
#[command(about = "Turn StackExchange questions into LaTeX", long_about = None)]
struct Args {
    /// Question URL, question ID, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (json, markup)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// Site that question IDs and relative links resolve against
    #[arg(long, default_value = DEFAULT_SITE, value_name = "URL")]
    site: String,

    /// Directory for downloaded images (markup only)
    #[arg(long, default_value = ".", value_name = "DIR")]
    images_dir: PathBuf,

    /// Never download images; figures reference the placeholder image
    #[arg(long)]
    no_images: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Retries for timeouts, connection failures and server errors
    #[arg(long, default_value = "2", value_name = "NUM")]
    retries: u32,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Answer order (accepted, votes, document)
    #[arg(long, default_value = "accepted", value_name = "ORDER")]
    order: AnswerOrder,

    /// Keep going when a field is missing, reporting it instead
    #[arg(long)]
    partial: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Where the page comes from.
enum Source {
    Stdin,
    File(String),
    Remote(QuestionRef),
}

impl Source {
    fn resolve(input: &str, site: &str) -> anyhow::Result<Self> {
        if input == "-" {
            Ok(Source::Stdin)
        } else if Path::new(input).is_file() {
            Ok(Source::File(input.to_string()))
        } else {
            QuestionRef::parse(input, site)
                .map(Source::Remote)
                .with_context(|| format!("{input} is neither a file nor a question on {site}"))
        }
    }

    fn describe(&self) -> String {
        match self {
            Source::Stdin => "Reading from stdin".to_string(),
            Source::File(path) => format!("Reading from file {}", path.bright_white()),
            Source::Remote(q) => format!("Fetching {}", q.url.as_str().bright_white().underline()),
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("qa2tex={level},qa2tex_core={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            echo::print_error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let started = Instant::now();
    let mut timings: Vec<(String, Duration)> = Vec::new();

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let site = Url::parse(&args.site).with_context(|| format!("Invalid site URL: {}", args.site))?;
    let source = Source::resolve(&args.input, &args.site)?;
    tracing::debug!(input = %args.input, format = ?args.format, "resolved input");

    let fetch = FetchConfig {
        timeout: args.timeout,
        retries: args.retries,
        user_agent: args.user_agent.clone().unwrap_or_else(|| FetchConfig::default().user_agent),
        ..FetchConfig::default()
    };
    let policy = if args.partial { FailurePolicy::Partial } else { FailurePolicy::AbortOnError };
    let config = ExtractConfig::builder()
        .answer_order(args.order)
        .policy(policy)
        .fetch(fetch.clone())
        .build();
    let extractor = QuestionExtractor::new(config);

    if args.verbose {
        echo::print_step(1, 3, &source.describe());
    }

    let step = Instant::now();
    let extraction = extract(&extractor, &source).await?;
    timings.push(("Extraction".to_string(), step.elapsed()));

    let Extraction { question, issues } = extraction;
    echo::print_issues(&issues);
    if args.verbose {
        echo::print_question_summary(&question);
    }

    if args.verbose {
        echo::print_step(2, 3, &format!("Rendering {:?}", args.format));
    }

    let step = Instant::now();
    let output = match args.format {
        OutputFormat::Json => {
            let json = question.to_json().context("Failed to serialize question")?;
            let mut text = serde_json::to_string_pretty(&json).context("Failed to serialize question")?;
            text.push('\n');
            text
        }
        OutputFormat::Markup => {
            let transpile = TranspileConfig::builder().base_url(site).output_dir(&args.images_dir).build();

            if args.no_images {
                render_markup(&question, transpile, OfflineResolver).await?
            } else {
                fs::create_dir_all(&args.images_dir)
                    .with_context(|| format!("Failed to create {}", args.images_dir.display()))?;
                let resolver = HttpImageResolver::new(fetch).context("Failed to build HTTP client")?;
                render_markup(&question, transpile, resolver).await?
            }
        }
    };
    timings.push(("Rendering".to_string(), step.elapsed()));

    if args.verbose {
        echo::print_step(3, 3, "Writing output");
        eprintln!("  {} {}\n", "Size:".dimmed(), echo::format_size(output.len()).bright_white());
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    if args.verbose {
        echo::print_timing_summary(started.elapsed(), &timings);
    }

    Ok(())
}

async fn extract(extractor: &QuestionExtractor, source: &Source) -> anyhow::Result<Extraction> {
    let html = match source {
        Source::Remote(question) => {
            return extractor
                .fetch(question.url.as_str())
                .await
                .with_context(|| format!("Failed to extract question {}", question.id));
        }
        Source::Stdin => fetch_stdin().context("Failed to read from stdin")?,
        Source::File(path) => fetch_file(path).with_context(|| format!("Failed to read file: {}", path))?,
    };

    let doc = Document::parse(&html).context("Failed to parse HTML")?;
    extractor.extract_document(&doc).context("Failed to extract question")
}

async fn render_markup<R: ImageResolver>(
    question: &Question, config: TranspileConfig, resolver: R,
) -> anyhow::Result<String> {
    let transpiler = Transpiler::new(config, resolver).context("Failed to build transpiler")?;
    markup::render(question, &transpiler).await.context("Failed to transpile posts")
}
