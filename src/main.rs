use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use treedocs::config::{self, Overrides};
use treedocs::generate::{self, GenerateError};
use treedocs::output;

#[derive(Parser)]
#[command(name = "treedocs")]
#[command(about = "Static documentation site generator for a directory of markdown files")]
#[command(long_about = "\
Static documentation site generator for a directory of markdown files

Your filesystem is the table of contents. Directories become menu sections,
markdown files become pages, and the menu nests exactly like the folders do.

Source structure:

  docs/
  ├── treedocs.toml                # Site config (optional)
  ├── README.md                    # Index page unless --index says otherwise
  ├── assets/                      # Copied verbatim to the output root
  ├── getting-started.md           # Page \"Getting Started\"
  └── guide/                       # Menu section \"Guide\"
      ├── setup.md                 # guide_setup.html
      └── advanced/                # Nested section \"Advanced\"
          └── tips.md              # advanced_tips.html

Directories without any markdown below them are left out of the menu.

Run 'treedocs gen-config' to generate a documented treedocs.toml.")]
#[command(version)]
struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by commands that scan a source directory.
#[derive(Args, Clone)]
struct SourceArgs {
    /// Directory containing the markdown files
    source: PathBuf,

    /// Only scan directories whose path matches this regex
    #[arg(short, long)]
    include: Option<String>,

    /// Skip directories whose path matches this regex
    #[arg(short, long)]
    exclude: Option<String>,

    /// Document used as index.html (file name, with or without extension)
    #[arg(short = 'n', long)]
    index: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site from SOURCE into TARGET
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory
        target: PathBuf,

        /// Title shown in the header and every page title
        #[arg(short = 't', long)]
        site_title: Option<String>,

        /// Comma-separated widgets to leave out: search,toc
        #[arg(long)]
        hide: Option<String>,
    },
    /// Scan and validate SOURCE without writing anything
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print a stock treedocs.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), GenerateError> {
    match command {
        Command::Build {
            source,
            target,
            site_title,
            hide,
        } => {
            let hide = hide.as_deref().map(config::parse_hide_list).transpose()?;
            let overrides = Overrides {
                site_title,
                hide,
                ..source_overrides(&source)
            };
            let site_config = config::load_config(&source.source, &overrides)?;
            tracing::debug!(?site_config, "configuration resolved");

            println!(
                "==> Building {} \u{2192} {}",
                source.source.display(),
                target.display()
            );
            let report = generate::generate(&source.source, &target, &site_config)?;
            output::print_build_output(&report);
        }
        Command::Check { source } => {
            let site_config = config::load_config(&source.source, &source_overrides(&source))?;
            println!("==> Checking {}", source.source.display());
            let prepared = generate::prepare(&source.source, &site_config)?;
            output::print_scan_output(&prepared);
            println!("==> Source is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }
    Ok(())
}

fn source_overrides(args: &SourceArgs) -> Overrides {
    Overrides {
        include: args.include.clone(),
        exclude: args.exclude.clone(),
        index: args.index.clone(),
        ..Overrides::default()
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise the `-v` count picks the level.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
