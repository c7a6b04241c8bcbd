//! blockhl - print a file with syntax highlighting
//!
//! Thin command-line host around the highlighting engine: it loads a
//! file into a document, picks a language and a theme, and paints the
//! result on stdout.

mod display;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use blockhl::config::Config;
use blockhl::syntax::builtin_themes;
use blockhl::{Document, Highlighter, Theme, PLAIN_TEXT};
use display::Painter;

#[derive(Debug, Parser)]
#[command(name = "blockhl", version, about = "Print a file with syntax highlighting")]
struct Cli {
    /// File to highlight
    file: Option<PathBuf>,

    /// Language ID (detected from the file name if omitted)
    #[arg(short, long)]
    lang: Option<String>,

    /// Built-in theme name or theme file
    #[arg(short, long)]
    theme: Option<String>,

    /// Directory of extra language definitions (<id>.toml)
    #[arg(long)]
    definitions: Option<PathBuf>,

    /// Always emit colors, even when stdout is not a terminal
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Never emit colors
    #[arg(long)]
    no_color: bool,

    /// List languages and themes, then exit
    #[arg(long)]
    list: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("blockhl={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(dir) = cli.definitions {
        config.definitions_dir = Some(dir);
    }

    let mut highlighter = Highlighter::new(config.resolver());

    if cli.list {
        println!("Languages: {}", highlighter.resolver().available().join(", "));
        println!("Themes: {}", builtin_themes().join(", "));
        return Ok(());
    }

    let Some(path) = cli.file else {
        bail!("no input file (see --help)");
    };
    let mut doc = Document::from_file(&path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    let theme: Theme = config.theme();
    highlighter.update_color(&mut doc, &theme);

    let language = match cli.lang {
        Some(lang) => lang,
        None => {
            let detected = highlighter.resolver().resolve(&path.to_string_lossy());
            if detected == PLAIN_TEXT {
                config.default_language.clone().unwrap_or(detected)
            } else {
                detected
            }
        }
    };

    // A missing or broken definition still prints the file, unhighlighted
    if let Err(e) = highlighter.set_language(&mut doc, &language) {
        eprintln!("Warning: {}", e);
    }

    let color = !cli.no_color && (cli.color || io::stdout().is_terminal());
    let mut painter = Painter::new(io::stdout().lock(), color);
    painter.paint(&doc, highlighter.styles())?;
    Ok(())
}
