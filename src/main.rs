//! moniwiki CLI.
//!
//! Provides commands for:
//! - `render`: Moniwiki page to HTML
//! - `markdown`: Markdown page to HTML with red links
//! - `transcode`: Moniwiki page to Markdown
//! - `migrate`: transcode every Moniwiki page in a directory
//! - `pages`: list the page-existence index of a directory

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use moniwiki::{PageDir, PageIndex, RenderOptions, WriteOptions};

#[derive(Parser)]
#[command(name = "moniwiki", version, about)]
struct Cli {
    /// YAML file with render options (URL prefixes, extensions, CSS classes).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log progress at info level (otherwise RUST_LOG applies).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the page-existence index comes from.
#[derive(Args)]
struct IndexArgs {
    /// Directory of pages (default: the directory holding FILE).
    #[arg(long, conflicts_with = "index_file")]
    pages_dir: Option<PathBuf>,

    /// JSON array of page names.
    #[arg(long = "index")]
    index_file: Option<PathBuf>,
}

impl IndexArgs {
    fn load(&self, file: &Path, opts: &RenderOptions) -> moniwiki::Result<PageIndex> {
        if let Some(path) = &self.index_file {
            return PageIndex::from_json(&fs::read_to_string(path)?);
        }
        let dir = match &self.pages_dir {
            Some(dir) => dir.as_path(),
            None => match file.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            },
        };
        PageDir::new(dir, opts).index()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render a Moniwiki page to HTML.
    Render {
        file: PathBuf,
        #[command(flatten)]
        pages: IndexArgs,
    },
    /// Render a Markdown page to HTML, marking links to missing pages.
    Markdown {
        file: PathBuf,
        #[command(flatten)]
        pages: IndexArgs,
    },
    /// Convert a Moniwiki page to Markdown.
    Transcode {
        file: PathBuf,
        /// Write `<name>.md` next to FILE instead of printing.
        #[arg(short, long)]
        write: bool,
        /// Replace an existing Markdown page.
        #[arg(long, requires = "write")]
        force: bool,
    },
    /// Convert every Moniwiki page in a directory to Markdown.
    Migrate {
        dir: PathBuf,
        /// Replace Markdown pages that already exist.
        #[arg(long)]
        force: bool,
    },
    /// List the pages in a directory.
    Pages {
        dir: PathBuf,
        /// Print a JSON array instead of one name per line.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> moniwiki::Result<()> {
    let opts = match &cli.config {
        Some(path) => RenderOptions::load(path)?,
        None => RenderOptions::default(),
    };

    match cli.command {
        Commands::Render { file, pages } => {
            let text = moniwiki::read_source(&file)?;
            let index = pages.load(&file, &opts)?;
            print!("{}", moniwiki::render_with_options(&text, &index, &opts));
        }
        Commands::Markdown { file, pages } => {
            let text = moniwiki::read_source(&file)?;
            let index = pages.load(&file, &opts)?;
            print!(
                "{}",
                moniwiki::render_markdown_with_options(&text, &index, &opts)
            );
        }
        Commands::Transcode { file, write, force } => {
            if write {
                let written =
                    moniwiki::transcode_file(&file, &opts, &WriteOptions { overwrite: force })?;
                println!("{}", written.display());
            } else {
                let text = moniwiki::read_source(&file)?;
                print!("{}", moniwiki::transcode_with_options(&text, &opts));
            }
        }
        Commands::Migrate { dir, force } => {
            moniwiki::migrate_dir(&dir, &opts, &WriteOptions { overwrite: force })?;
        }
        Commands::Pages { dir, json } => {
            let names = PageDir::new(&dir, &opts).list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }
    }
    Ok(())
}
