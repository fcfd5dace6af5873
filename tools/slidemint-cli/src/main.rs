//! SlideMint CLI: draft posts, build carousels, and export slides.
//!
//! Usage:
//!   slidemint profile set|show        Manage the branding profile
//!   slidemint key set|clear|status    Manage the Gemini API key
//!   slidemint draft <TOPIC> -i ...    Generate a post and one image per insight
//!   slidemint edit-image <IMAGE>      Rework an image with an instruction
//!   slidemint deck <ACTION>           Build and edit a carousel deck
//!   slidemint export <DECK>           Export slides as PNG or PDF
//!   slidemint check                   Check configuration and credentials

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use slidemint_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "slidemint",
    about = "Carousel content studio: AI drafts, slide overlays, and exports",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the branding profile (username and avatar)
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Manage the Gemini API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Generate a narrative post and one slide image per insight
    Draft {
        /// Topic of the post
        topic: String,

        /// Core insight (repeat for up to six)
        #[arg(short, long = "insight", required = true)]
        insights: Vec<String>,

        /// Writing tone: professional, casual, inspirational, thought-leader, controversial
        #[arg(short, long, default_value = "professional")]
        tone: String,

        /// Output directory for the post and images
        #[arg(short, long, default_value = "draft")]
        output: PathBuf,
    },

    /// Rework an existing image according to an instruction
    EditImage {
        /// Image to edit
        input: PathBuf,

        /// What to change
        #[arg(short, long)]
        instruction: String,

        /// Output file (defaults to <input>-edited.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build and edit a carousel deck
    Deck {
        #[command(subcommand)]
        action: DeckAction,
    },

    /// Export a deck as slide PNGs or a carousel PDF
    Export {
        /// Path to the deck file
        deck: PathBuf,

        /// Export only this slide (1-based) as PNG
        #[arg(short, long)]
        slide: Option<usize>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export every slide as PNG instead of one PDF
        #[arg(long)]
        png: bool,

        /// PDF page edge in millimetres
        #[arg(long)]
        page_mm: Option<f32>,
    },

    /// Check configuration, credentials, profile, and fonts
    Check,
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Set username and avatar
    Set {
        /// Handle shown on every slide
        #[arg(short, long)]
        username: String,

        /// Avatar image file
        #[arg(short, long)]
        avatar: PathBuf,
    },

    /// Show the current profile
    Show,
}

#[derive(Subcommand)]
pub enum KeyAction {
    /// Store a new API key
    Set {
        /// The key itself
        key: String,
    },

    /// Remove the stored API key
    Clear,

    /// Show whether a key is available
    Status,
}

#[derive(Subcommand)]
pub enum DeckAction {
    /// Create an empty deck file
    Init {
        /// Path of the new deck file
        path: PathBuf,

        /// Deck name
        #[arg(short, long, default_value = "carousel")]
        name: String,

        /// Article used as context when analysing images
        #[arg(short, long)]
        context: Option<String>,
    },

    /// Attach background images as new slides
    Add {
        /// Path to the deck file
        path: PathBuf,

        /// Image files, in carousel order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Skip AI analysis; slides start with an empty caption
        #[arg(long)]
        no_analyze: bool,
    },

    /// List slides
    List {
        /// Path to the deck file
        path: PathBuf,
    },

    /// Remove a slide
    Remove {
        /// Path to the deck file
        path: PathBuf,

        /// Slide number (1-based)
        slide: usize,
    },

    /// Move a slide one position up or down
    Move {
        /// Path to the deck file
        path: PathBuf,

        /// Slide number (1-based)
        slide: usize,

        /// Direction: up or down
        direction: String,
    },

    /// Replace a slide's caption
    Text {
        /// Path to the deck file
        path: PathBuf,

        /// Slide number (1-based)
        slide: usize,

        /// New caption
        text: String,
    },

    /// Set a slide's theme (light background or dark background)
    Theme {
        /// Path to the deck file
        path: PathBuf,

        /// Slide number (1-based)
        slide: usize,

        /// light or dark
        theme: String,
    },

    /// Move caption and pillar to a vertical zone
    Place {
        /// Path to the deck file
        path: PathBuf,

        /// Slide number (1-based)
        slide: usize,

        /// top, center, or bottom
        placement: String,
    },

    /// Drag an overlay element to a point given in canvas percent
    Drag {
        /// Path to the deck file
        path: PathBuf,

        /// Slide number (1-based)
        slide: usize,

        /// content, pillar, branding, or navigation
        element: String,

        /// Target x in percent
        x: f64,

        /// Target y in percent
        y: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    slidemint_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Profile { action } => commands::profile::run(&config, action),
        Commands::Key { action } => commands::key::run(action),
        Commands::Draft {
            topic,
            insights,
            tone,
            output,
        } => commands::draft::run(&config, topic, insights, tone, output).await,
        Commands::EditImage {
            input,
            instruction,
            output,
        } => commands::edit_image::run(&config, input, instruction, output).await,
        Commands::Deck { action } => commands::deck::run(&config, action).await,
        Commands::Export {
            deck,
            slide,
            output,
            png,
            page_mm,
        } => commands::export::run(&config, deck, slide, output, png, page_mm),
        Commands::Check => commands::check::run(&config),
    }
}
