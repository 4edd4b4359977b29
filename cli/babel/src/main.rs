//! Babel CLI: seed-derived CPU core generator.

mod commands;
mod config;
mod pipeline;

use std::path::PathBuf;
use std::process;

use babel_search::SimilaritySearchEngine;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::lexicon::LexiconSource;
use config::BabelConfig;
use pipeline::Settings;

#[derive(Parser)]
#[command(name = "babel", version, about = "Seed-derived micro-x86 core generator")]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Custom lexicon TOML file (overrides babel.toml)
    #[arg(long, global = true)]
    lexicon: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Artifact directory (default: [output] dir in babel.toml, else .)
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Skip the external verification step
    #[arg(long)]
    no_verify: bool,
    /// Do not write the assembler stub
    #[arg(long)]
    no_assembler: bool,
    /// Verification timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Candidate seeds, comma separated (default: seed_0..seed_9)
    #[arg(long, value_delimiter = ',')]
    candidates: Option<Vec<String>>,
    /// Number of ranked results to print
    #[arg(long)]
    top_k: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the core for a seed, optionally ranking candidates by query words
    Generate {
        /// Seed string; any text, including empty
        seed: String,
        /// Descriptive query words (e.g. cisc powerful fast_memory)
        words: Vec<String>,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Generate cores for many seeds in parallel
    Batch {
        /// Seed strings
        #[arg(required = true)]
        seeds: Vec<String>,
        /// Worker threads (default: available parallelism)
        #[arg(short, long)]
        jobs: Option<usize>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Rank candidate seeds by similarity to query words
    Search {
        /// Descriptive query words
        #[arg(required = true)]
        words: Vec<String>,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// List lexicon words and their preferences
    Lexicon,
    /// Check configuration and verification tool status
    Doctor,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    // doctor must run even when babel.toml is broken
    if let Commands::Doctor = cli.command {
        return commands::doctor::run(&cwd, cli.lexicon.as_deref());
    }

    let config = BabelConfig::find_and_load(&cwd)?
        .map(|(config, _)| config)
        .unwrap_or_default();
    // CLI flag > babel.toml > built-in table, loaded by the commands that use it
    let lexicon = LexiconSource {
        path: cli.lexicon.or_else(|| config.search.lexicon.clone()),
    };

    match cli.command {
        Commands::Generate {
            seed,
            words,
            output,
            search,
        } => {
            let (settings, verification) = resolve_output(&config, &output);
            let candidates = search
                .candidates
                .unwrap_or_else(|| config.search.candidates.clone());
            let query = commands::generate::Query {
                words: &words,
                candidates: &candidates,
                top_k: search.top_k.unwrap_or(config.search.top_k),
                lexicon: &lexicon,
            };
            commands::generate::run(&seed, &query, &settings, verification.adapter().as_ref())
        }

        Commands::Batch {
            seeds,
            jobs,
            output,
        } => {
            let (settings, verification) = resolve_output(&config, &output);
            let jobs = jobs.unwrap_or_else(|| {
                std::thread::available_parallelism().map_or(1, |n| n.get())
            });
            commands::batch::run(&seeds, jobs, &settings, verification.adapter().as_ref())
        }

        Commands::Search { words, search } => {
            let lexicon = lexicon.load()?;
            let engine = SimilaritySearchEngine::new(&lexicon);
            let candidates = search
                .candidates
                .unwrap_or_else(|| config.search.candidates.clone());
            let top_k = search.top_k.unwrap_or(config.search.top_k);
            commands::search::run(&engine, &words, &candidates, top_k)
        }

        Commands::Lexicon => commands::lexicon::run(&*lexicon.load()?),

        Commands::Doctor => commands::doctor::run(&cwd, lexicon.path.as_deref()),
    }
}

/// Merge output flags over the loaded configuration.
fn resolve_output(
    config: &BabelConfig,
    output: &OutputArgs,
) -> (Settings, config::VerificationConfig) {
    let settings = Settings {
        out_dir: output
            .out_dir
            .clone()
            .unwrap_or_else(|| config.output.dir.clone()),
        assembler_stub: config.output.assembler_stub && !output.no_assembler,
    };
    let mut verification = config.verification.clone();
    if output.no_verify {
        verification.enabled = false;
    }
    if let Some(timeout) = output.timeout {
        verification.timeout_secs = timeout;
    }
    (settings, verification)
}
