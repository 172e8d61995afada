use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Env;
use log::{debug, info};
use markov_text_core::model::markov_text::MarkovText;
use markov_text_core::model::options::{
    DEFAULT_MAX_LENGTH, DeadEndPolicy, EmptyModelPolicy, GenerationOptions, StartSeed,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate text from a first-order Markov chain", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    /// Corpus files, concatenated in order
    #[arg(value_name = "FILE", required_unless_present = "text")]
    corpus: Vec<PathBuf>,

    /// Use this string as the corpus instead of reading files
    #[arg(long, conflicts_with = "corpus")]
    text: Option<String>,

    /// Maximum number of tokens per generated line
    #[arg(short = 'n', long, value_name = "COUNT", default_value_t = DEFAULT_MAX_LENGTH)]
    max_length: usize,

    /// Start every line from this token
    #[arg(short, long, value_name = "TOKEN")]
    seed_term: Option<String>,

    /// Seed the random generator for reproducible output
    #[arg(long, value_name = "SEED")]
    rng_seed: Option<u64>,

    /// Behaviour when a token has no followers
    #[arg(long, value_enum, default_value_t = DeadEndArg::Stop)]
    dead_end: DeadEndArg,

    /// Behaviour when the corpus contains no tokens
    #[arg(long, value_enum, default_value_t = EmptyModelArg::Empty)]
    empty_model: EmptyModelArg,

    /// Number of lines to generate
    #[arg(short, long, value_name = "COUNT", default_value_t = 1)]
    count: usize,

    /// Print the transition table as JSON instead of generating
    #[arg(long)]
    table: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DeadEndArg {
    Stop,
    Reseed,
}

impl From<DeadEndArg> for DeadEndPolicy {
    fn from(value: DeadEndArg) -> Self {
        match value {
            DeadEndArg::Stop => DeadEndPolicy::StopEarly,
            DeadEndArg::Reseed => DeadEndPolicy::Reseed,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EmptyModelArg {
    Fail,
    Empty,
}

impl From<EmptyModelArg> for EmptyModelPolicy {
    fn from(value: EmptyModelArg) -> Self {
        match value {
            EmptyModelArg::Fail => EmptyModelPolicy::Fail,
            EmptyModelArg::Empty => EmptyModelPolicy::ReturnEmpty,
        }
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    let level = match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => "off",
        -1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

impl Cli {
    fn options(&self) -> Result<GenerationOptions> {
        let mut options =
            GenerationOptions::new(self.max_length).context("invalid --max-length")?;
        options.dead_end = self.dead_end.into();
        options.empty_model = self.empty_model.into();
        options.start = StartSeed::from(self.seed_term.clone());
        Ok(options)
    }

    fn load_model(&self) -> Result<MarkovText> {
        let options = self.options()?;
        let mut model = match &self.text {
            Some(text) => MarkovText::new(text),
            None => MarkovText::from_files(&self.corpus).context("failed to load corpus")?,
        };
        *model.options_mut() = options;
        Ok(model)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    debug!("{cli:?}");

    let model = cli.load_model()?;
    let table = model.build_transition_table();
    info!(
        "corpus has {} tokens, {} distinct",
        model.tokens().len(),
        table.len()
    );
    let options = model.options();
    info!(
        "dead_end {}, empty_model {}",
        options.dead_end, options.empty_model
    );
    debug!("options {}", serde_json::to_string(options)?);

    if cli.table {
        println!("{}", serde_json::to_string_pretty(table)?);
        return Ok(());
    }

    let mut rng = match cli.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    for _ in 0..cli.count {
        let line = model
            .generate_configured(&mut rng)
            .context("generation failed")?;
        println!("{line}");
    }

    Ok(())
}
