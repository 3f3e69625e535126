use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use libngram_core::{Config, CorpusOutcome, CorpusSpec, EstimatorPolicy, Pipeline, TokenizerPolicy};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// Raw wiki dump: cleaned, whitespace-split, Laplace -ln scores.
    Wiki,
    /// `id \t sentence` files: punctuation tokens, MLE, per-corpus directory.
    Sentences,
}

/// Build n-gram count and probability tables from text corpora.
#[derive(Parser)]
#[command(name = "build_ngrams")]
struct Args {
    /// TOML config with `[[corpus]]` entries. Overrides --preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Corpus to process, as `path` or `name=path`. Repeatable.
    #[arg(long = "input", num_args = 1..)]
    inputs: Vec<String>,

    #[arg(long, value_enum, default_value = "wiki")]
    preset: Preset,

    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// whitespace | punctuation
    #[arg(long)]
    tokenizer: Option<TokenizerPolicy>,

    /// laplace | mle
    #[arg(long)]
    estimator: Option<EstimatorPolicy>,

    #[arg(long)]
    max_order: Option<usize>,

    /// Count each order on its own thread.
    #[arg(long)]
    parallel: bool,

    /// Write the effective config to this path and continue.
    #[arg(long)]
    dump_config: Option<PathBuf>,
}

fn parse_input(arg: &str) -> CorpusSpec {
    if let Some((name, path)) = arg.split_once('=') {
        if !name.is_empty() && !path.is_empty() {
            return CorpusSpec::new(name, path);
        }
    }
    let path = Path::new(arg);
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("corpus");
    CorpusSpec::new(name, path)
}

fn effective_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_toml(path).with_context(|| format!("load config {}", path.display()))?,
        None => match args.preset {
            Preset::Wiki => Config::wiki(),
            Preset::Sentences => Config::sentences(),
        },
    };

    config.corpora.extend(args.inputs.iter().map(|s| parse_input(s)));
    if let Some(tokenizer) = args.tokenizer {
        config.tokenizer = tokenizer;
    }
    if let Some(estimator) = args.estimator {
        config.estimator = estimator;
    }
    if let Some(max_order) = args.max_order {
        config.max_order = max_order;
    }
    if args.parallel {
        config.parallel_orders = true;
    }

    config.validate().context("invalid configuration")?;
    if config.corpora.is_empty() {
        bail!("no corpora configured: pass --input or a config with [[corpus]] entries");
    }
    Ok(config)
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = effective_config(&args)?;

    if let Some(path) = &args.dump_config {
        config
            .save_toml(path)
            .with_context(|| format!("write config {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote effective config");
    }

    let report = Pipeline::new(config).run(&args.out);

    for outcome in &report.outcomes {
        match outcome {
            CorpusOutcome::Succeeded(done) => println!(
                "{}: {} tokens, {} types, {} files",
                done.name,
                done.summary.total_tokens,
                done.summary.vocabulary_size,
                done.artifacts.len()
            ),
            CorpusOutcome::Skipped { name, path } => println!("{}: skipped, {} not found", name, path.display()),
            CorpusOutcome::Failed { name, error } => println!("{}: failed, {}", name, error),
        }
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_name_defaults_to_file_stem() {
        let spec = parse_input("data/kabyle.txt");
        assert_eq!(spec.name, "kabyle");
        assert_eq!(spec.path, PathBuf::from("data/kabyle.txt"));
    }

    #[test]
    fn input_accepts_explicit_name() {
        let spec = parse_input("fr=corpus/fra_sentences.tsv");
        assert_eq!(spec.name, "fr");
        assert_eq!(spec.path, PathBuf::from("corpus/fra_sentences.tsv"));
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let args = Args::parse_from([
            "build_ngrams",
            "--preset",
            "sentences",
            "--input",
            "a.tsv",
            "--estimator",
            "laplace",
            "--max-order",
            "3",
            "--parallel",
        ]);
        let config = effective_config(&args).unwrap();
        assert_eq!(config.estimator, EstimatorPolicy::Laplace);
        assert_eq!(config.tokenizer, TokenizerPolicy::Punctuation);
        assert_eq!(config.max_order, 3);
        assert!(config.parallel_orders);
        assert_eq!(config.corpora.len(), 1);
    }

    #[test]
    fn rejects_empty_run_and_bad_order() {
        let args = Args::parse_from(["build_ngrams"]);
        assert!(effective_config(&args).is_err());
        let args = Args::parse_from(["build_ngrams", "--input", "x.txt", "--max-order", "9"]);
        assert!(effective_config(&args).is_err());
    }

    #[test]
    fn rejects_input_names_outside_out_dir() {
        let args = Args::parse_from(["build_ngrams", "--input", "../escape=data/kab.txt"]);
        assert!(effective_config(&args).is_err());
    }
}
