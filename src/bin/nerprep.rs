//! nerprep - NER dataset preparation CLI.
//!
//! ```bash
//! # Convert a JSONL corpus into train/val/types artifacts
//! nerprep convert corpus.jsonl --out-dir data --prefix runne
//!
//! # Look at a corpus before converting it
//! nerprep inspect corpus.jsonl
//!
//! # Shell completions
//! nerprep completions zsh > _nerprep
//! ```
//!
//! Skipped sentences and dropped entities are summarized on stderr after a
//! conversion; run with `RUST_LOG=debug` for the individual reasons.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use nerprep::convert::{convert_corpus, read_corpus, write_artifacts, DEFAULT_VAL_FRAC};
use nerprep::{Error, RawDocument, Result};

/// NER dataset preparation - char-span JSONL to token-indexed training JSON
#[derive(Parser)]
#[command(name = "nerprep")]
#[command(
    author,
    version,
    about = "NER dataset preparation - char-span JSONL to token-indexed training JSON",
    long_about = r#"
nerprep - prepare character-span NER corpora for span-based model training

INPUT (one JSON object per line):
  {"id": 1, "sentences": "<full text>", "ners": [[start, end, "TYPE"], ...]}
  with zero-based character offsets, end exclusive.

OUTPUT (per `convert` run):
  <prefix>_val.json    records from the validation prefix of the corpus
  <prefix>_train.json  records from the training suffix
  <prefix>_types.json  entity-type registry

Each record covers one sentence: its tokens, entities as token-index spans,
and the neighboring sentences' tokens as unlabeled context. Sentences that
keep no entity after remapping are omitted.

EXAMPLES:
  nerprep convert corpus.jsonl
  nerprep convert corpus.jsonl --out-dir data --prefix runne --val-frac 0.2
  nerprep inspect corpus.jsonl
"#
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a corpus into training/validation/type artifacts
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Show document/entity statistics for a corpus
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Input corpus (JSONL, one document per line)
    input: PathBuf,

    /// Directory for the emitted artifacts (created if missing)
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Artifact name prefix (<prefix>_train.json, <prefix>_val.json,
    /// <prefix>_types.json)
    #[arg(long, default_value = "runne")]
    prefix: String,

    /// Fraction of documents (a prefix of the corpus) held out for validation
    #[arg(long, default_value_t = DEFAULT_VAL_FRAC)]
    val_frac: f64,

    /// Suppress the conversion summary
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Args)]
struct InspectArgs {
    /// Input corpus (JSONL, one document per line)
    input: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert(args) => cmd_convert(args),
        Commands::Inspect(args) => cmd_inspect(args),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "nerprep", &mut io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_convert(args: ConvertArgs) -> Result<()> {
    if !(0.0..=1.0).contains(&args.val_frac) {
        return Err(Error::InvalidInput(format!(
            "--val-frac must be within [0, 1], got {}",
            args.val_frac
        )));
    }

    let docs = read_corpus(&args.input)?;
    let total_docs = docs.len();

    let corpus = convert_corpus(docs, args.val_frac);

    std::fs::create_dir_all(&args.out_dir)?;
    write_artifacts(&corpus, &args.out_dir, &args.prefix)?;

    if !args.quiet {
        eprintln!(
            "{} documents -> {} validation + {} training records, {} entity types",
            total_docs,
            corpus.validation.len(),
            corpus.training.len(),
            corpus.types.entities.len()
        );
        let sentences = corpus.skips.iter().filter(|s| s.reason.is_sentence()).count();
        let entities = corpus.skips.len() - sentences;
        if sentences > 0 || entities > 0 {
            eprintln!(
                "skipped {sentences} sentences, dropped {entities} entities \
                 (RUST_LOG=debug for details)"
            );
        }
        eprintln!("wrote artifacts to {}", args.out_dir.display());
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> Result<()> {
    let docs = read_corpus(&args.input)?;

    let total_chars: usize = docs.iter().map(|d| d.sentences.chars().count()).sum();
    let total_entities: usize = docs.iter().map(|d| d.ners.len()).sum();
    let mut per_label: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &docs {
        for entity in &doc.ners {
            *per_label.entry(entity.label.as_str()).or_default() += 1;
        }
    }

    println!("documents: {}", docs.len());
    println!("characters: {total_chars}");
    println!("entities: {total_entities}");
    println!("entity types: {}", per_label.len());
    for (label, count) in &per_label {
        println!("  {label}: {count}");
    }
    if let Some(widest) = docs.iter().max_by_key(|d: &&RawDocument| d.ners.len()) {
        println!(
            "densest document: id {} with {} entities",
            widest.id,
            widest.ners.len()
        );
    }
    Ok(())
}
