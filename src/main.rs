use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::path::PathBuf;
use tab_gal::gallery::GalleryState;
use tab_gal::listing::build_lister;
use tab_gal::output::{self, PrintSink};
use tab_gal::resolve::Resolver;
use tab_gal::session::{Input, Key, Session};
use tab_gal::types::CategoryKey;
use tab_gal::{config, generate, imaging, metadata};

#[derive(Parser)]
#[command(name = "tab-gal")]
#[command(about = "Tabbed photo gallery with a lightbox viewer")]
#[command(long_about = "\
Tabbed photo gallery with a lightbox viewer

Each tab is a category. A category's photos come from one directory listing
(the GitHub contents API, or a local folder), filtered to known image
extensions, grouped by base name and sorted.

Layout when listing locally:

  <root>/
  ├── config.toml                  # Optional, overrides stock defaults
  └── assets/images/               # [gallery] image_root
      ├── sport/
      │   ├── photo-01.jpg
      │   └── photo-02.jpg
      └── portrait/
          ├── dawn.avif            # Grouped mode: preferred encoding
          └── dawn.jpg             #               fallback

Diagnostics go to stderr; set RUST_LOG=debug for details.

Run 'tab-gal gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Project directory holding config.toml and the local image root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one category and print its photos
    List {
        /// Category to list (defaults to the configured default category)
        category: Option<String>,
        /// Print the resolved sequence as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a static HTML page per category
    Generate {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Drive the gallery interactively from stdin
    Browse,
    /// Read image dimensions in a directory and print a [metadata] section
    Probe {
        /// Directory of images (one category folder)
        dir: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::List { category, json } => {
            let config = config::load_config(&cli.root)?;
            let lister = build_lister(&config, &cli.root);
            let category = category
                .map(CategoryKey::new)
                .unwrap_or_else(|| config.default_category());
            let mut state = GalleryState::new(Resolver::from_config(&config));
            state.activate(category, &lister);
            if let Some(snapshot) = state.current() {
                if json {
                    println!("{}", serde_json::to_string_pretty(&*snapshot.sequence)?);
                } else {
                    output::print_snapshot(snapshot);
                }
            }
        }
        Command::Generate { output: out_dir } => {
            let config = config::load_config(&cli.root)?;
            let lister = build_lister(&config, &cli.root);
            let report = generate::generate(&config, &lister, &out_dir)?;
            output::print_generate_output(&report);
        }
        Command::Browse => {
            let config = config::load_config(&cli.root)?;
            let lister = build_lister(&config, &cli.root);
            let mut session = Session::new(Resolver::from_config(&config), lister, PrintSink);
            session.handle(Input::SelectTab(config.default_category()));
            for line in std::io::stdin().lock().lines() {
                let line = line?;
                match parse_command(&line) {
                    Some(BrowseLine::Quit) => break,
                    Some(BrowseLine::Input(input)) => {
                        session.handle(input);
                    }
                    None if line.trim().is_empty() => {}
                    None => eprintln!("unknown command: {}", line.trim()),
                }
            }
        }
        Command::Probe { dir } => {
            let config = config::load_config(&cli.root)?;
            let extensions = config.resolve_policy().extensions;
            let map = imaging::probe_directory(&dir, &extensions)?;
            log::info!("probed {} images in {}", map.len(), dir.display());
            print!("{}", metadata::to_toml_section(&map)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// One line of `browse` input.
enum BrowseLine {
    Input(Input),
    Quit,
}

/// Parse a browse line. `open` takes the 1-based index shown by `list`.
fn parse_command(line: &str) -> Option<BrowseLine> {
    let mut words = line.split_whitespace();
    let verb = words.next()?;
    let arg = words.next();
    let input = match (verb, arg) {
        ("quit" | "exit", None) => return Some(BrowseLine::Quit),
        ("tab", Some(name)) => Input::SelectTab(CategoryKey::new(name)),
        ("open", Some(n)) => {
            let n: usize = n.parse().ok()?;
            Input::SelectItem(n.checked_sub(1)?)
        }
        ("next", None) => Input::Next,
        ("prev", None) => Input::Prev,
        ("close", None) => Input::Close,
        ("key", Some(name)) => Input::Key(Key::from_name(name)),
        _ => return None,
    };
    Some(BrowseLine::Input(input))
}
