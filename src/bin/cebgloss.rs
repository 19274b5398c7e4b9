//! cebgloss: extract glossaries from a Cebuano corpus.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use cebuano_glossary::format::{corpus_io, ArtifactWriter};
use cebuano_glossary::{
    GlossaryStore, JsonDictionaryProvider, JsonGlossaryStore, Pipeline, PipelineConfig,
    TokenStreamBuilder, WordListLexicon,
};

#[derive(Parser)]
#[command(name = "cebgloss", version, about = "Cebuano glossary extraction")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the pipeline over a directory of raw .txt documents.
    Run {
        /// Directory of raw extracted text files.
        #[arg(long)]
        corpus: PathBuf,
        /// Word list used as the lexical validity oracle.
        #[arg(long)]
        lexicon: PathBuf,
        /// Output directory for artifacts.
        #[arg(long)]
        out: PathBuf,
        /// Optional TOML config.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Submit one new document against a validated reference corpus.
    Submit {
        /// Directory of validated token files (one token per line).
        #[arg(long)]
        reference: PathBuf,
        /// Raw extracted text of the new document.
        #[arg(long)]
        document: PathBuf,
        #[arg(long)]
        lexicon: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// JSON dictionary (term -> definition fields) used to define the glossary.
        #[arg(long)]
        definitions: Option<PathBuf>,
        /// Directory where defined glossaries are stored per run id.
        #[arg(long, requires = "definitions")]
        store: Option<PathBuf>,
        /// Print the glossary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the token stream of one raw text file.
    Tokenize {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(p) => PipelineConfig::load(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn build_pipeline(config: Option<&Path>, lexicon: &Path) -> Result<Pipeline> {
    let config = load_config(config)?;
    let lexicon = WordListLexicon::load(lexicon)
        .with_context(|| format!("failed to load lexicon {}", lexicon.display()))?;
    Ok(Pipeline::new(config, lexicon)?)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Run {
            corpus,
            lexicon,
            out,
            config,
        } => {
            let pipeline = build_pipeline(config.as_deref(), &lexicon)?;
            let raw = corpus_io::read_raw_texts(&corpus)
                .with_context(|| format!("failed to read corpus {}", corpus.display()))?;
            let snapshot = pipeline.ingest(&raw)?;
            let run = pipeline.run(&snapshot)?;
            let summary = ArtifactWriter::new(&out).write_run(&run)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Submit {
            reference,
            document,
            lexicon,
            out,
            config,
            definitions,
            store,
            json,
        } => {
            let pipeline = build_pipeline(config.as_deref(), &lexicon)?;
            let reference = corpus_io::load_snapshot(&reference)
                .with_context(|| format!("failed to load reference {}", reference.display()))?;
            let document_id = corpus_io::document_id(&document)?;
            let text = std::fs::read_to_string(&document)
                .with_context(|| format!("failed to read {}", document.display()))?;

            let submission = pipeline.submit(&reference, &document_id, &text)?;
            ArtifactWriter::new(&out).write_run(&submission.run)?;

            let words = submission.glossary().map(|g| g.words()).unwrap_or_default();

            let defined = match (definitions, submission.glossary()) {
                (Some(path), Some(glossary)) => {
                    let provider = JsonDictionaryProvider::load(&path)
                        .with_context(|| format!("failed to load dictionary {}", path.display()))?;
                    let defined = pipeline.define(&provider, glossary);
                    if let Some(root) = store {
                        // The glossary is final; a store failure is only reported.
                        if let Err(e) = JsonGlossaryStore::new(root).put(
                            submission.run.run_id,
                            &document_id,
                            &defined,
                        ) {
                            log::warn!("Failed to store definitions: {}", e);
                        }
                    }
                    Some(defined)
                }
                _ => None,
            };

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "id": submission.run.run_id,
                        "status": if words.is_empty() { "empty" } else { "success" },
                        "document": document_id,
                        "words": words,
                        "definitions": defined,
                    }))?
                );
            } else if let Some(defined) = defined {
                for term in defined {
                    println!("{}\t{}", term.word, term.definition.translation);
                }
            } else {
                for word in words {
                    println!("{}", word);
                }
            }
        }
        Command::Tokenize { input, config } => {
            let config = load_config(config.as_deref())?;
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            for token in TokenStreamBuilder::from_config(&config.tokenizer).tokenize(&text) {
                println!("{}", token);
            }
        }
    }

    Ok(())
}
