mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lrcat_core::config::CatalogOptions;
use lrcat_core::Library;
use tracing_subscriber::{fmt, EnvFilter};

use commands::collection::KindArg;
use commands::images::PickArg;

/// lrcat: build and organize Lightroom Classic catalogs
#[derive(Parser)]
#[command(name = "lrcat", version, about)]
struct Cli {
    /// Path to the .lrcat catalog file
    #[arg(long, global = true, default_value_t = default_catalog_path())]
    catalog: String,

    /// TOML file with catalog options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Open the catalog without allowing writes
    #[arg(long, global = true)]
    read_only: bool,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty catalog
    Create {
        /// Replace an existing catalog file
        #[arg(long)]
        force: bool,
    },
    /// Show catalog status summary
    Status,
    /// Import every supported image under a directory
    Import {
        /// Directory to import
        path: PathBuf,
        /// Only import files directly inside the directory
        #[arg(long)]
        no_recursive: bool,
    },
    /// Manage root folders, or list folders when no action is given
    Folders {
        #[command(subcommand)]
        action: Option<FoldersAction>,
    },
    /// List images, optionally filtered by keyword or collection
    Images {
        /// Only images tagged with this keyword id
        #[arg(long, conflicts_with = "collection")]
        keyword: Option<i64>,
        /// Only images in this collection id
        #[arg(long)]
        collection: Option<i64>,
    },
    /// Inspect or edit a single image
    Image {
        #[command(subcommand)]
        action: ImageAction,
    },
    /// Manage keywords, or list the keyword tree when no action is given
    Keyword {
        #[command(subcommand)]
        action: Option<KeywordAction>,
    },
    /// Manage collections, or list them when no action is given
    Collection {
        #[command(subcommand)]
        action: Option<CollectionAction>,
    },
    /// Read or write an image's embedded XMP packet
    Xmp {
        #[command(subcommand)]
        action: XmpAction,
    },
}

#[derive(Subcommand)]
enum FoldersAction {
    /// Register a directory as a root folder
    Add {
        /// Path to the directory
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum ImageAction {
    /// Show an image with its keywords and collections
    Show { id: i64 },
    /// Set the star rating (omit to clear)
    Rate { id: i64, rating: Option<u8> },
    /// Set the color label (omit to clear)
    Label { id: i64, label: Option<String> },
    /// Set the pick flag
    Pick {
        id: i64,
        #[arg(value_enum)]
        flag: PickArg,
    },
}

#[derive(Subcommand)]
enum KeywordAction {
    /// Create a keyword path such as "Animals/Dogs/Labrador"
    Add { path: String },
    /// Tag an image with a keyword path, creating it if needed
    Tag { image: i64, path: String },
    /// Remove a keyword from an image
    Untag { image: i64, keyword: i64 },
}

#[derive(Subcommand)]
enum CollectionAction {
    /// Create a collection path such as "Trips/2024/Rome"
    Add {
        path: String,
        #[arg(long, value_enum, default_value_t = KindArg::Standard)]
        kind: KindArg,
    },
    /// Add images to a collection
    Put {
        collection: i64,
        #[arg(required = true)]
        images: Vec<i64>,
    },
    /// Remove an image from a collection
    Rm { collection: i64, image: i64 },
    /// Show a collection and its images in order
    Show { id: i64 },
    /// Delete a collection and everything nested under it
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum XmpAction {
    /// Print the decoded XMP packet
    Show { image: i64 },
    /// Store the XMP packet read from a file
    Set { image: i64, file: PathBuf },
    /// Generate a minimal packet from the image's own fields and store it
    Basic { image: i64 },
}

fn default_catalog_path() -> String {
    dirs_path().to_string_lossy().to_string()
}

fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".lrcat").join("catalog.lrcat")
}

/// Filter directive forced by `-v` flags; `None` defers to `RUST_LOG`.
fn verbosity_directive(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbosity_directive(verbose) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(config: Option<&Path>, read_only: bool) -> Result<CatalogOptions> {
    let mut options = match config {
        Some(path) => CatalogOptions::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CatalogOptions::default(),
    };
    if read_only {
        options.read_only = true;
    }
    Ok(options)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog_path = PathBuf::from(&cli.catalog);
    let options = load_options(cli.config.as_deref(), cli.read_only)?;
    tracing::debug!(
        catalog = %catalog_path.display(),
        read_only = options.read_only,
        root_match = ?options.root_match,
        "resolved catalog options"
    );

    let mut library = match &cli.command {
        Commands::Create { force } => commands::create::run(&catalog_path, options, *force)?,
        _ => Library::open(&catalog_path, options)
            .with_context(|| format!("failed to open catalog {}", catalog_path.display()))?,
    };

    match cli.command {
        Commands::Create { .. } => commands::status::run(&library)?,
        Commands::Status => commands::status::run(&library)?,
        Commands::Import { path, no_recursive } => {
            commands::import::run(&mut library, &path, !no_recursive)?
        }
        Commands::Folders { action } => match action {
            None => commands::folders::list(&library)?,
            Some(FoldersAction::Add { path }) => commands::folders::add(&library, &path)?,
        },
        Commands::Images {
            keyword,
            collection,
        } => commands::images::list(&library, keyword, collection)?,
        Commands::Image { action } => match action {
            ImageAction::Show { id } => commands::images::show(&library, id)?,
            ImageAction::Rate { id, rating } => commands::images::rate(&library, id, rating)?,
            ImageAction::Label { id, label } => {
                commands::images::label(&library, id, label.as_deref())?
            }
            ImageAction::Pick { id, flag } => commands::images::pick(&library, id, flag)?,
        },
        Commands::Keyword { action } => match action {
            None => commands::keyword::list(&library)?,
            Some(KeywordAction::Add { path }) => commands::keyword::add(&mut library, &path)?,
            Some(KeywordAction::Tag { image, path }) => {
                commands::keyword::tag(&mut library, image, &path)?
            }
            Some(KeywordAction::Untag { image, keyword }) => {
                commands::keyword::untag(&library, image, keyword)?
            }
        },
        Commands::Collection { action } => match action {
            None => commands::collection::list(&library)?,
            Some(CollectionAction::Add { path, kind }) => {
                commands::collection::add(&mut library, &path, kind)?
            }
            Some(CollectionAction::Put { collection, images }) => {
                commands::collection::put(&mut library, collection, &images)?
            }
            Some(CollectionAction::Rm { collection, image }) => {
                commands::collection::rm(&mut library, collection, image)?
            }
            Some(CollectionAction::Show { id }) => commands::collection::show(&library, id)?,
            Some(CollectionAction::Delete { id }) => {
                commands::collection::delete(&mut library, id)?
            }
        },
        Commands::Xmp { action } => match action {
            XmpAction::Show { image } => commands::xmp::show(&library, image)?,
            XmpAction::Set { image, file } => commands::xmp::set(&library, image, &file)?,
            XmpAction::Basic { image } => commands::xmp::basic(&library, image)?,
        },
    }

    Ok(())
}
