//! hrplatform CLI: build the atlas site and study from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hrplatform", version, about = "International human rights atlas")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the static site
    Build {
        /// Data directory (overrides config)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Base URL to fetch data from (overrides config and --data)
        #[arg(long)]
        data_url: Option<String>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Initial section, as a URL fragment (e.g. "timeline", "spider-web?filter=un")
        #[arg(long)]
        section: Option<String>,

        /// Initial timeline view: eras, zoom, stacked
        #[arg(long, default_value = "eras")]
        view: String,

        /// Initial timeline filter: all or an event type
        #[arg(long, default_value = "all")]
        filter: String,

        /// Directory of HTML study guides (overrides config)
        #[arg(long)]
        guides: Option<PathBuf>,
    },

    /// Check the data files for consistency problems
    Validate {
        /// Data directory (overrides config)
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Take a quiz in the terminal
    Quiz {
        /// Data directory (overrides config)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Category id, or "all"
        #[arg(long, default_value = "all")]
        category: String,

        /// Difficulty level, or "all"
        #[arg(long, default_value = "all")]
        difficulty: String,

        /// Number of questions; 0 takes every matching question
        #[arg(long, default_value = "10")]
        count: usize,

        /// Question language: en, sl
        #[arg(long)]
        lang: Option<String>,

        /// Seed for question order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show saved quiz history and viewing progress
    Stats {
        /// Clear all saved progress
        #[arg(long)]
        reset: bool,
    },

    /// Search treaties, institutions and timeline events
    Search {
        /// Search text (at least two characters)
        query: String,

        /// Data directory (overrides config)
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Create a starter config and data directory
    Init,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "hrplatform=debug"
    } else {
        "hrplatform=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().unwrap()),
        )
        .init();

    let config = cli.config;
    let result = match cli.command {
        Commands::Build {
            data,
            data_url,
            output,
            section,
            view,
            filter,
            guides,
        } => {
            commands::build::execute(commands::build::BuildArgs {
                config,
                data,
                data_url,
                output,
                section,
                view,
                filter,
                guides,
            })
            .await
        }
        Commands::Validate { data } => commands::validate::execute(config, data).await,
        Commands::Quiz {
            data,
            category,
            difficulty,
            count,
            lang,
            seed,
        } => {
            commands::quiz::execute(config, data, category, difficulty, count, lang, seed).await
        }
        Commands::Stats { reset } => commands::stats::execute(config, reset),
        Commands::Search { query, data } => commands::search::execute(config, data, query).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
