//! @ai:module:intent CLI entry point for building and querying the section registry
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on config, registry, output

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use coqspec::{output, ExtractConfig, OutputFormat, SectionRegistry};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "coqspec")]
#[command(author, version, about = "Extract specification annotations from Coq sources")]
struct Cli {
    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the registry and print every section
    Extract {
        #[command(flatten)]
        build: BuildArgs,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Print a single section
    Show {
        /// Section number, e.g. 22.2.2.1
        section: String,

        #[command(flatten)]
        build: BuildArgs,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },

    /// Write the default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "coqspec.toml")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Files or directories to scan (added to those in the config file)
    paths: Vec<PathBuf>,

    /// Path prefix to leave out; may be repeated
    #[arg(long, short = 'x')]
    exclude: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the section scope pattern
    #[arg(long)]
    scope: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
    Html,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
            Format::Html => OutputFormat::Html,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "coqspec=debug" } else { "coqspec=info" };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        level
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Extract { build, format } => {
            let registry = build_registry(build)?;
            println!("{}", output::format_registry(&registry, format.into()));
            Ok(ExitCode::SUCCESS)
        }

        Commands::Show {
            section,
            build,
            format,
        } => {
            let registry = build_registry(build)?;
            match registry.lookup(&section) {
                Ok(found) => {
                    println!("{}", output::format_section(&section, found, format.into()));
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) if e.is_not_found() => {
                    eprintln!("Error: {}", e);
                    Ok(ExitCode::from(1))
                }
                Err(e) => Err(e.into()),
            }
        }

        Commands::Init { output } => {
            ExtractConfig::default()
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!("Wrote default configuration to {}", output.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// @ai:intent Merge CLI arguments into the loaded config and build the registry
/// @ai:effects fs:read
fn build_registry(args: BuildArgs) -> anyhow::Result<SectionRegistry> {
    let mut config = match &args.config {
        Some(path) => ExtractConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ExtractConfig::default(),
    };

    config.sources.extend(args.paths);
    config.exclude.extend(args.exclude);
    if let Some(scope) = args.scope {
        config.patterns.scope = scope;
    }

    if config.sources.is_empty() {
        anyhow::bail!("no sources given; pass paths or set `sources` in the config file");
    }

    let registry = SectionRegistry::build(&config).context("Failed to build section registry")?;
    Ok(registry)
}
