use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use strum::VariantNames;
use tally::{SupplyRequest, WordSequence};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod error;
mod generator;
mod sink;
mod summary;

use crate::app::{App, StdinSource};
use crate::config::{Generator, Settings, WordLanguage};
use crate::error::AppError;
use crate::generator::LocalSupplier;

#[derive(Debug, Parser)]
#[command(name = "tiptyp", version, about, long_about = None)]
struct Cli {
    /// Directory holding `settings.toml`
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start a typing test (the default)
    Run {
        #[command(flatten)]
        words: WordArgs,

        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a generated word list and exit
    Words {
        #[command(flatten)]
        words: WordArgs,
    },
    /// Show the effective settings
    Config,
}

#[derive(Debug, Default, Args)]
struct WordArgs {
    /// Number of words, between 10 and 100
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// words, model or syllable
    #[arg(short, long)]
    generator: Option<Generator>,

    /// ru or en
    #[arg(short, long)]
    language: Option<WordLanguage>,
}

impl WordArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(count) = self.count {
            settings.word_count = count.clamp(SupplyRequest::MIN_COUNT, SupplyRequest::MAX_COUNT);
        }
        if let Some(generator) = self.generator {
            settings.generator = generator;
        }
        if let Some(language) = self.language {
            settings.language = language;
        }
    }
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut settings = Settings::load(cli.config.clone())?;
    match cli.command.unwrap_or(Commands::Run {
        words: WordArgs::default(),
        json: false,
    }) {
        Commands::Run { words, json } => {
            words.apply(&mut settings);
            App::new(settings, json).run(&StdinSource::new(), &mut std::io::stdout().lock())?;
        }
        Commands::Words { words } => {
            words.apply(&mut settings);
            let generated = LocalSupplier::new().generate(&settings.supply_request());
            match WordSequence::new(generated) {
                Some(sequence) => println!("{}", sequence.target_text()),
                None => tracing::warn!("the generator produced no words"),
            }
        }
        Commands::Config => {
            if let Some(dir) = cli.config.or_else(config::config_dir) {
                println!("# {}", dir.join("settings.toml").display());
            }
            println!("# generators: {}", Generator::VARIANTS.join(", "));
            println!("# languages:  {}", WordLanguage::VARIANTS.join(", "));
            print!("{}", toml::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
