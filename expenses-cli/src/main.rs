use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use expenses_core::{Source, TagVocabulary, Txn, yearly_spend_by_tag};
use expenses_sync::{Embedder, export_all, read_export, upload_all, write_export};
use expenses_tagger::{TagClassifier, evaluate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

mod config;
mod logging;
mod ollama;
mod runtime;
mod state;
mod store;

use config::Config;
use ollama::OllamaClient;
use store::StoreClient;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("EXPENSES_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "expenses",
    version = VERSION,
    about = "Normalize bank exports, sync them with the transaction store and evaluate tagging"
)]
struct Cli {
    /// Config file (default: ~/.expenses/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging, including full prompts and model answers
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a source adapter and print the canonical records as JSON
    Normalize {
        /// RBC_CHEQUING, RBC_MASTERCARD, CIBC_VISA or AMEX_COBALT
        #[arg(long)]
        source: Source,

        /// Bank export (.csv, or .xlsx/.xls/.ods)
        #[arg(long)]
        file: PathBuf,

        /// Write the JSON array here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Normalize an export, embed each description and post it to the store
    Upload {
        #[arg(long)]
        source: Source,

        #[arg(long)]
        file: PathBuf,

        /// Post records without `desc_embedding`
        #[arg(long)]
        skip_embeddings: bool,
    },

    /// Export every stored transaction to a JSON file
    Download {
        /// Default: store.export_path
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Measure tag classification accuracy on a seeded sample
    TagEval {
        /// Exported set (default: store.export_path)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Default: eval.sample_size
        #[arg(long)]
        sample: Option<usize>,

        /// Default: eval.seed
        #[arg(long)]
        seed: Option<u64>,

        /// Chat model (default: ollama.chat_model)
        #[arg(long)]
        model: Option<String>,
    },

    /// Yearly spend per tag (expenses only, transfers excluded)
    Summary {
        #[arg(long)]
        input: Option<PathBuf>,

        #[arg(long)]
        from_year: Option<i32>,

        #[arg(long)]
        to_year: Option<i32>,
    },

    /// Write ~/.expenses/config.toml with defaults if it does not exist
    InitConfig,

    /// Print the effective configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_override = cli.config.as_deref();
    let load = || config::load_config(config_override);

    match cli.command {
        Command::Normalize { source, file, out } => {
            normalize(source, &file, out.as_deref())?;
        }

        Command::Upload {
            source,
            file,
            skip_embeddings,
        } => {
            upload(&load()?, source, &file, skip_embeddings)?;
        }

        Command::Download { out } => {
            let cfg = load()?;
            let out = out.unwrap_or_else(|| cfg.store.export_path.clone());
            download(&cfg, &out)?;
        }

        Command::TagEval {
            input,
            sample,
            seed,
            model,
        } => {
            let mut cfg = load()?;
            if let Some(model) = model {
                cfg.ollama.chat_model = model;
            }
            let input = input.unwrap_or_else(|| cfg.store.export_path.clone());
            let sample = sample.unwrap_or(cfg.eval.sample_size);
            let seed = seed.unwrap_or(cfg.eval.seed);
            tag_eval(&cfg, &input, sample, seed)?;
        }

        Command::Summary {
            input,
            from_year,
            to_year,
        } => {
            let cfg = load()?;
            let input = input.unwrap_or_else(|| cfg.store.export_path.clone());
            summary(&input, from_year, to_year)?;
        }

        Command::InitConfig => {
            config::init_config(config_override)?;
        }

        Command::ShowConfig => {
            let cfg = load()?;
            let s = toml::to_string_pretty(&cfg).context("serialize config")?;
            print!("{s}");
        }
    }

    Ok(())
}

fn normalize(source: Source, file: &Path, out: Option<&Path>) -> Result<()> {
    let txns = expenses_ingest::load_export(source, file)
        .with_context(|| format!("normalizing {} as {source}", file.display()))?;
    let json = serde_json::to_string_pretty(&txns).context("encode records")?;

    match out {
        Some(p) => {
            fs::write(p, json).with_context(|| format!("write {}", p.display()))?;
            println!("Wrote {} records to {}", txns.len(), p.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn upload(cfg: &Config, source: Source, file: &Path, skip_embeddings: bool) -> Result<()> {
    let txns = expenses_ingest::load_export(source, file)
        .with_context(|| format!("normalizing {} as {source}", file.display()))?;

    let ollama = OllamaClient::new(&cfg.ollama);
    let embedder: Option<&dyn Embedder> = if skip_embeddings { None } else { Some(&ollama) };
    let store = StoreClient::new(&cfg.store.base_url);

    let report = upload_all(txns, embedder, &store)?;
    println!(
        "Uploaded {} transactions ({} with embeddings) from {}",
        report.uploaded,
        report.embedded,
        file.display()
    );
    Ok(())
}

fn download(cfg: &Config, out: &Path) -> Result<()> {
    let store = StoreClient::new(&cfg.store.base_url);
    let txns = export_all(&store, cfg.store.page_limit)?;
    write_export(out, &txns)?;
    println!("Wrote {} transactions to {}", txns.len(), out.display());
    Ok(())
}

fn load_exported(input: &Path) -> Result<Vec<Txn>> {
    let stored = read_export(input)
        .with_context(|| format!("loading {} (run `expenses download` first?)", input.display()))?;
    Ok(stored.into_iter().map(|s| s.txn).collect())
}

fn tag_eval(cfg: &Config, input: &Path, sample: usize, seed: u64) -> Result<()> {
    let txns = load_exported(input)?;
    let vocab = TagVocabulary::from_txns(&txns);
    info!(
        records = txns.len(),
        tags = vocab.len(),
        model = %cfg.ollama.chat_model,
        "starting tag evaluation"
    );

    let classifier = TagClassifier::new(OllamaClient::new(&cfg.ollama));
    let report = evaluate(&classifier, &txns, &vocab, sample, seed)?;
    println!("{report}");
    Ok(())
}

fn summary(input: &Path, from_year: Option<i32>, to_year: Option<i32>) -> Result<()> {
    let txns = load_exported(input)?;
    let rows = yearly_spend_by_tag(&txns, from_year, to_year);
    if rows.is_empty() {
        println!("No expenses in range");
        return Ok(());
    }
    for r in &rows {
        println!("{}  {:<24} {:>12.2}", r.year, r.tag, r.total);
    }
    Ok(())
}
