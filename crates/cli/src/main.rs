//! Echocoach CLI — linking, stress and intonation annotation for practice sentences.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use echocoach_core::cache::{AnnotationCache, cache_key};
use echocoach_core::history::{PracticeHistory, default_history_path};
use echocoach_core::language::linking::{create_linked_sentence, h_dropped_form};
use echocoach_core::prosody::repair::repair;
use echocoach_core::{ProsodyAnnotation, annotate_response};

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "echocoach",
    about = "American English linking, stress and intonation coach",
    version,
)]
struct Cli {
    /// Show verbose output
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Annotate a sentence with linking, stress, intonation and IPA
    Annotate(AnnotateArgs),
    /// Print the sentence with linking marks
    Link(LinkArgs),
    /// Clean up an IPA transcription for a sentence
    Repair(RepairArgs),
    /// Show or maintain the practice history
    History(HistoryArgs),
}

#[derive(Parser, Debug)]
struct AnnotateArgs {
    /// Sentence to annotate
    #[arg(required = true)]
    text: Vec<String>,

    /// File with the raw model reply to validate ("-" reads stdin)
    #[arg(long)]
    response: Option<PathBuf>,

    /// Print the annotation as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Disable file-based caching
    #[arg(long, default_value_t = false)]
    no_cache: bool,

    /// Do not record the sentence in the practice history
    #[arg(long, default_value_t = false)]
    no_history: bool,

    /// History file (default: $ECHOCOACH_HISTORY_FILE or ~/.local/share/echocoach/history.json)
    #[arg(long)]
    history_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct LinkArgs {
    /// Sentence to link
    #[arg(required = true)]
    text: Vec<String>,

    /// Show dropped /h/ in linked words ("tell‿'im")
    #[arg(long, default_value_t = false)]
    h_dropping: bool,
}

#[derive(Parser, Debug)]
struct RepairArgs {
    /// Sentence the transcription belongs to
    text: String,

    /// IPA transcription to repair
    phonetic: String,
}

#[derive(Parser, Debug)]
struct HistoryArgs {
    /// Remove all history items
    #[arg(long, default_value_t = false, conflicts_with = "revalidate")]
    clear: bool,

    /// Regenerate stored annotations that no longer match their sentence
    #[arg(long, default_value_t = false)]
    revalidate: bool,

    /// Number of items to show
    #[arg(long, default_value_t = 10)]
    limit: usize,

    /// History file (default: $ECHOCOACH_HISTORY_FILE or ~/.local/share/echocoach/history.json)
    #[arg(long)]
    history_file: Option<PathBuf>,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    // Init logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Annotate(args) => run_annotate(args),
        Command::Link(args) => run_link(args),
        Command::Repair(args) => run_repair(args),
        Command::History(args) => run_history(args),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Join positional words back into one sentence.
fn sentence_from_args(words: &[String]) -> Result<String> {
    let text = words.join(" ");
    if text.trim().is_empty() {
        bail!("Sentence is empty");
    }
    Ok(text)
}

/// Read the raw model reply from a file, or stdin for "-".
fn read_response(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read model reply from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model reply: {}", path.display()))
}

fn print_annotation(annotation: &ProsodyAnnotation, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(annotation)?);
    } else {
        println!("Linked:     {}", annotation.full_linked_sentence);
        println!("Intonation: {}", annotation.intonation_map);
        println!("Phonetic:   /{}/", annotation.full_linked_phonetic);
    }
    Ok(())
}

/// Rewrite h-dropping words that follow a link mark ("tell‿him" → "tell‿'im").
fn show_h_dropping(linked: &str) -> String {
    linked
        .split(' ')
        .map(|group| {
            group
                .split('‿')
                .enumerate()
                .map(|(i, word)| {
                    if i == 0 {
                        return word.to_string();
                    }
                    let dropped = h_dropped_form(word);
                    if dropped == word {
                        return dropped;
                    }
                    let trailing: String = word
                        .chars()
                        .rev()
                        .take_while(|c| !c.is_alphanumeric())
                        .collect::<Vec<_>>()
                        .into_iter()
                        .rev()
                        .collect();
                    format!("{}{}", dropped, trailing)
                })
                .collect::<Vec<_>>()
                .join("‿")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ─── Runners ─────────────────────────────────────────────────────

fn run_annotate(args: AnnotateArgs) -> Result<()> {
    let text = sentence_from_args(&args.text)?;
    let response = args.response.as_ref().map(read_response).transpose()?;

    let cache = AnnotationCache::open_default();
    log::debug!("Cache dir: {}", cache.dir().display());
    let key = cache_key(&text, response.as_deref());

    let cached = if args.no_cache { None } else { cache.get(&key) };
    let annotation = match cached {
        Some(annotation) => annotation,
        None => {
            let annotation = annotate_response(&text, response.as_deref());
            if !args.no_cache {
                if let Err(e) = cache.store(&key, &annotation) {
                    log::warn!("Could not cache annotation: {:#}", e);
                }
            }
            annotation
        }
    };

    print_annotation(&annotation, args.json)?;

    if !args.no_history {
        let path = args.history_file.unwrap_or_else(default_history_path);
        let mut history = PracticeHistory::load(&path)?;
        history.record(&text, annotation);
        history.save()?;
        log::debug!("Recorded in history: {}", history.path().display());
    }

    Ok(())
}

fn run_link(args: LinkArgs) -> Result<()> {
    let text = sentence_from_args(&args.text)?;
    let linked = create_linked_sentence(&text);
    if args.h_dropping {
        println!("{}", show_h_dropping(&linked));
    } else {
        println!("{}", linked);
    }
    Ok(())
}

fn run_repair(args: RepairArgs) -> Result<()> {
    println!("{}", repair(&args.text, &args.phonetic));
    Ok(())
}

fn run_history(args: HistoryArgs) -> Result<()> {
    let path = args.history_file.unwrap_or_else(default_history_path);
    let mut history = PracticeHistory::load(&path)?;

    if args.clear {
        history.clear();
        history.save()?;
        println!("Cleared history: {}", history.path().display());
        return Ok(());
    }

    if args.revalidate {
        let changed = history.revalidate();
        history.save()?;
        println!("Regenerated {} of {} item(s)", changed, history.items().len());
    }

    if history.items().is_empty() {
        println!("No practice history yet");
        return Ok(());
    }
    for item in history.items().iter().take(args.limit) {
        println!("{}  {}", item.timestamp, item.annotation.full_linked_sentence);
        println!("    {}", item.annotation.intonation_map);
        println!("    /{}/", item.annotation.full_linked_phonetic);
    }
    Ok(())
}
