//! untex CLI - LaTeX to word token extraction tool
//!
//! A command-line tool for stripping LaTeX markup and producing normalized,
//! tagged word tokens.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use untex::{BodyMode, Document, Pipeline, PipelineConfig, PipelineOutput, RuleLemmatizer, Tag};

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "UNTEX_LOG";

/// LaTeX document to word token extraction
#[derive(Parser)]
#[command(
    name = "untex",
    version,
    about = "Extract normalized word tokens from LaTeX documents",
    long_about = "untex - LaTeX markup stripping and word tokenization.\n\n\
                  Removes comments, formulas, environments and commands from a LaTeX\n\
                  manuscript and emits tagged, normalized tokens.\n\n\
                  Usage:\n  \
                  untex <file>              Print the tokens of a document\n  \
                  untex tokens <file> -f json\n  \
                  untex strip <file>        Print the stripped prose"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (for default tokenization)
    #[arg(global = false)]
    input: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a document
    #[command(visible_alias = "tok")]
    Tokens {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Strip markup and print the remaining prose
    Strip {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How to locate the document body
        #[arg(long, default_value = "required")]
        body_mode: BodyModeArg,
    },

    /// Print the raw document body
    Body {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show document structure and stripping statistics
    Info {
        /// Input file path
        input: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Tokenize several documents in parallel, one JSON file each
    Batch {
        /// Input file paths
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Show version information
    Version,
}

/// Pipeline options shared by the tokenizing commands
#[derive(Args, Default)]
struct PipelineArgs {
    /// JSON pipeline configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable every step with English stopwords
    #[arg(long)]
    full: bool,

    /// Tokenize the raw text without stripping markup
    #[arg(long, conflicts_with = "full")]
    raw: bool,

    /// How to locate the document body
    #[arg(long)]
    body_mode: Option<BodyModeArg>,

    /// Split hyphenated words
    #[arg(long)]
    split_hyphens: bool,

    /// Reduce words to their lemma
    #[arg(long)]
    lemmatize: bool,

    /// Word list restricting lemmas (one word per line, WordNet index files work)
    #[arg(long, value_name = "FILE")]
    lexicon: Option<PathBuf>,

    /// Drop English stopwords
    #[arg(long)]
    stopwords: bool,

    /// Drop the words listed in a file (one per line)
    #[arg(long, value_name = "FILE")]
    stopword_file: Option<PathBuf>,

    /// Keep only these tags (comma separated)
    #[arg(long, value_delimiter = ',')]
    tags: Vec<TagArg>,

    /// Remove punctuation from tokens
    #[arg(long)]
    no_punctuation: bool,

    /// Drop tokens of a single character
    #[arg(long)]
    no_single_chars: bool,
}

/// Token output format
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Token texts separated by spaces
    Text,
    /// Pipeline output as JSON
    Json,
    /// One `text<TAB>TAG` line per token
    Tsv,
}

/// Body extraction mode
#[derive(Clone, Copy, ValueEnum)]
enum BodyModeArg {
    /// Fail when the body delimiters are missing
    Required,
    /// Use the whole text when the body delimiters are missing
    IfPresent,
    /// Never look for the body
    Skip,
}

impl From<BodyModeArg> for BodyMode {
    fn from(mode: BodyModeArg) -> Self {
        match mode {
            BodyModeArg::Required => BodyMode::Required,
            BodyModeArg::IfPresent => BodyMode::IfPresent,
            BodyModeArg::Skip => BodyMode::Skip,
        }
    }
}

/// Part-of-speech tag
#[derive(Clone, Copy, ValueEnum)]
enum TagArg {
    Noun,
    Verb,
    Adj,
    Adv,
    Other,
}

impl From<TagArg> for Tag {
    fn from(tag: TagArg) -> Self {
        match tag {
            TagArg::Noun => Tag::Noun,
            TagArg::Verb => Tag::Verb,
            TagArg::Adj => Tag::Adj,
            TagArg::Adv => Tag::Adv,
            TagArg::Other => Tag::Other,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so token output on stdout stays clean.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Some(command) = cli.command else {
        // Handle default command (untex <file>)
        if let Some(input) = cli.input {
            return run_tokens(&input, None, OutputFormat::Text, &PipelineArgs::default());
        }
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Tokens {
            input,
            output,
            format,
            pipeline,
        } => {
            run_tokens(&input, output.as_ref(), format, &pipeline)?;
        }

        Commands::Strip {
            input,
            output,
            body_mode,
        } => {
            let pb = create_spinner("Stripping markup...");

            let doc = Document::from_path(&input)?;
            let config = PipelineConfig::new()
                .with_clean_markup()
                .with_body_mode(body_mode.into());
            let stripped = Pipeline::new(config)?.strip(&doc)?;

            pb.finish_and_clear();
            write_output(output.as_ref(), &stripped.text)?;

            if let Some(path) = output {
                println!(
                    "{} Stripped {} of {} characters: {}",
                    "✓".green().bold(),
                    stripped.stats.removed(),
                    stripped.stats.body_len(),
                    path.display()
                );
            }
        }

        Commands::Body { input, output } => {
            let doc = Document::from_path(&input)?;
            let body = doc.body()?;
            write_output(output.as_ref(), body)?;
        }

        Commands::Info { input, pipeline } => {
            run_info(&input, &pipeline)?;
        }

        Commands::Batch {
            inputs,
            output,
            pipeline,
        } => {
            run_batch(&inputs, &output, &pipeline)?;
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn run_tokens(
    input: &Path,
    output: Option<&PathBuf>,
    format: OutputFormat,
    args: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = create_spinner("Reading document...");

    let doc = Document::from_path(input)?;
    let pipeline = build_pipeline(args)?;

    pb.set_message("Tokenizing...");
    let result = pipeline.run(&doc)?;
    let rendered = format_tokens(&result, format)?;

    pb.finish_and_clear();
    write_output(output, &rendered)?;

    if let Some(path) = output {
        println!(
            "{} Wrote {} tokens: {}",
            "✓".green().bold(),
            result.tokens.len(),
            path.display()
        );
    }
    Ok(())
}

fn run_info(input: &Path, args: &PipelineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pb = create_spinner("Analyzing document...");

    let doc = Document::from_path(input)?;
    let pipeline = build_pipeline(args)?;
    let result = pipeline.run(&doc);

    pb.finish_and_clear();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "File".bold(), doc.name());
    println!("{}: {}", "Characters".bold(), doc.char_count());
    println!(
        "{}: {}",
        "Body".bold(),
        if doc.has_body() { "found" } else { "missing" }
    );

    println!("\n{}", "Stripping".cyan().bold());
    println!("{}", "─".repeat(40));
    match &result {
        Ok(PipelineOutput {
            strip_stats: Some(stats),
            ..
        }) => {
            for (phase, len) in &stats.lengths {
                println!("{:<20} {:>10}", format!("{}", phase).bold(), len);
            }
        }
        Ok(_) => println!("{}", "markup cleaning disabled".dimmed()),
        Err(e) => println!("{} {}", "!".yellow().bold(), e),
    }

    println!("\n{}", "Tokens".cyan().bold());
    println!("{}", "─".repeat(40));
    match result {
        Ok(output) => {
            println!("{}: {}", "Count".bold(), output.tokens.len());
            for tag in Tag::ALL {
                let count = output.tokens.iter().filter(|t| t.tag == tag).count();
                if count > 0 {
                    println!("  {:<8} {}", tag.as_str(), count);
                }
            }
        }
        Err(_) => println!("{}: {}", "Count".bold(), "-".dimmed()),
    }
    Ok(())
}

fn run_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    args: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = create_spinner("Reading documents...");

    let pipeline = build_pipeline(args)?;
    fs::create_dir_all(output_dir)?;

    let mut docs = Vec::with_capacity(inputs.len());
    let mut failed = 0;
    for input in inputs {
        match Document::from_path(input) {
            Ok(doc) => docs.push(doc),
            Err(e) => {
                pb.println(format!("  {} {}: {}", "✗".red(), input.display(), e));
                failed += 1;
            }
        }
    }

    pb.set_message(format!("Tokenizing {} documents...", docs.len()));
    let results = pipeline.run_batch(&docs);

    let names = output_file_names(docs.iter().map(Document::name));
    let mut written = 0;
    for ((doc, result), name) in docs.iter().zip(results).zip(names) {
        match result {
            Ok(output) => {
                let path = output_dir.join(name);
                fs::write(&path, serde_json::to_string_pretty(&output)?)?;
                pb.println(format!(
                    "  {} {} ({} tokens) -> {}",
                    "✓".green(),
                    doc.name(),
                    output.tokens.len(),
                    path.display()
                ));
                written += 1;
            }
            Err(e) => {
                pb.println(format!("  {} {}: {}", "✗".red(), doc.name(), e));
                failed += 1;
            }
        }
    }

    pb.finish_and_clear();
    tracing::info!(written, failed, "batch_complete");

    println!("{}", "Batch Complete".green().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Output".bold(), output_dir.display());
    println!("{}: {}", "Written".bold(), written);
    if failed > 0 {
        println!("{}: {}", "Failed".bold(), failed.to_string().red());
    }
    Ok(())
}

/// One JSON file name per document: `paper.tex` -> `paper.json`.
///
/// Names are unique within a batch; a repeated stem gets a counter
/// (`paper-2.json`, `paper-3.json`, ...).
fn output_file_names<'a>(documents: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut used = HashSet::new();
    documents
        .into_iter()
        .map(|document| {
            let stem = Path::new(document)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| document.to_string());
            let mut name = format!("{}.json", stem);
            let mut n = 1;
            while !used.insert(name.clone()) {
                n += 1;
                name = format!("{}-{}.json", stem, n);
            }
            name
        })
        .collect()
}

/// Resolves the pipeline configuration: config file or preset, then flags.
fn resolve_config(args: &PipelineArgs) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None if args.full => PipelineConfig::full(),
        None => PipelineConfig::new().with_clean_markup(),
    };

    if args.raw {
        config.clean_markup = false;
    }
    if let Some(mode) = args.body_mode {
        config = config.with_body_mode(mode.into());
    }
    if args.split_hyphens {
        config = config.with_split_hyphenation();
    }
    if args.lemmatize || args.lexicon.is_some() {
        config = config.with_lemmatize();
    }
    if args.stopwords {
        config = config.with_english_stopwords();
    }
    if let Some(path) = &args.stopword_file {
        let content = fs::read_to_string(path)?;
        let mut words = config.stopwords.take().unwrap_or_default();
        words.extend(
            content
                .lines()
                .map(|line| line.trim().to_lowercase())
                .filter(|word| !word.is_empty()),
        );
        config.stopwords = Some(words);
    }
    if !args.tags.is_empty() {
        config = config.with_tag_allowlist(args.tags.iter().copied().map(Tag::from));
    }
    if args.no_punctuation {
        config = config.with_delete_punctuation();
    }
    if args.no_single_chars {
        config = config.with_delete_single_characters();
    }

    config.validate()?;
    Ok(config)
}

fn build_pipeline(args: &PipelineArgs) -> Result<Pipeline, Box<dyn std::error::Error>> {
    let pipeline = Pipeline::new(resolve_config(args)?)?;
    Ok(match &args.lexicon {
        Some(path) => {
            let lemmatizer = RuleLemmatizer::from_lexicon_file(path)?;
            pipeline.with_lemmatizer(Arc::new(lemmatizer))
        }
        None => pipeline,
    })
}

fn format_tokens(output: &PipelineOutput, format: OutputFormat) -> serde_json::Result<String> {
    Ok(match format {
        OutputFormat::Text => output
            .tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        OutputFormat::Json => serde_json::to_string_pretty(output)?,
        OutputFormat::Tsv => output
            .tokens
            .iter()
            .map(|t| format!("{}\t{}", t.text, t.tag))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

fn print_version() {
    println!("{} {}", "untex".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("LaTeX markup stripping and word tokenization");
    println!();
    println!("Formats: text, json, tsv");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use untex::Token;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tokens_command() {
        let cli = Cli::try_parse_from([
            "untex",
            "tokens",
            "paper.tex",
            "--format",
            "tsv",
            "--lemmatize",
            "--tags",
            "noun,verb",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Tokens {
                input,
                format,
                pipeline,
                ..
            }) => {
                assert_eq!(input, PathBuf::from("paper.tex"));
                assert!(matches!(format, OutputFormat::Tsv));
                assert!(pipeline.lemmatize);
                assert_eq!(pipeline.tags.len(), 2);
            }
            _ => panic!("expected tokens command"),
        }
    }

    #[test]
    fn test_raw_conflicts_with_full() {
        assert!(Cli::try_parse_from(["untex", "tokens", "a.tex", "--raw", "--full"]).is_err());
    }

    #[test]
    fn test_resolve_config_flags() {
        let args = PipelineArgs {
            split_hyphens: true,
            lemmatize: true,
            stopwords: true,
            tags: vec![TagArg::Noun],
            no_punctuation: true,
            ..Default::default()
        };
        let config = resolve_config(&args).unwrap();
        assert!(config.clean_markup);
        assert!(config.split_hyphenation);
        assert!(config.lemmatize);
        assert!(config.has_stopwords());
        assert_eq!(config.tag_allowlist, Some([Tag::Noun].into()));
        assert!(config.delete_punctuation);
        assert!(!config.delete_single_characters);
    }

    #[test]
    fn test_resolve_config_raw() {
        let args = PipelineArgs {
            raw: true,
            ..Default::default()
        };
        assert!(!resolve_config(&args).unwrap().clean_markup);
    }

    #[test]
    fn test_format_tokens() {
        let output = PipelineOutput {
            document: "doc".to_string(),
            tokens: vec![Token::new("graph", Tag::Noun), Token::new("grow", Tag::Verb)],
            strip_stats: None,
        };
        assert_eq!(format_tokens(&output, OutputFormat::Text).unwrap(), "graph grow");
        assert_eq!(
            format_tokens(&output, OutputFormat::Tsv).unwrap(),
            "graph\tNOUN\ngrow\tVERB"
        );
        assert!(format_tokens(&output, OutputFormat::Json)
            .unwrap()
            .contains("\"document\": \"doc\""));
    }

    #[test]
    fn test_output_file_names() {
        assert_eq!(
            output_file_names(["paper.tex", "notes"]),
            vec!["paper.json", "notes.json"]
        );
    }

    #[test]
    fn test_output_file_names_never_collide() {
        let names = output_file_names(["paper.tex", "paper.md", "paper-2.tex", "paper.tex"]);
        assert_eq!(
            names,
            vec!["paper.json", "paper-2.json", "paper-2-2.json", "paper-3.json"]
        );
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_info_run_follows_pipeline_flags() {
        let fragment = Document::new("fragment.tex", r"plain $x$ words");

        let raw = PipelineArgs {
            raw: true,
            ..Default::default()
        };
        let output = build_pipeline(&raw).unwrap().run(&fragment).unwrap();
        assert!(output.strip_stats.is_none());

        let required = PipelineArgs::default();
        assert!(build_pipeline(&required).unwrap().run(&fragment).is_err());

        let skip = PipelineArgs {
            body_mode: Some(BodyModeArg::Skip),
            ..Default::default()
        };
        let output = build_pipeline(&skip).unwrap().run(&fragment).unwrap();
        let stats = output.strip_stats.unwrap();
        assert_eq!(stats.final_len(), "plain  words".chars().count());
    }
}
