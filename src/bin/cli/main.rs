mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lexis-cli", about = "Lexis vocabulary trainer CLI", version)]
struct Cli {
    /// Use a specific data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List words with their mastered/important flags
    Words {
        /// Skip this many words
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Maximum words to list
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Only mastered words
        #[arg(long)]
        mastered: bool,

        /// Only important words
        #[arg(long)]
        important: bool,

        /// Only important words not yet mastered
        #[arg(long)]
        review: bool,
    },

    /// Deal a shuffled hand of words to study
    Shuffle {
        /// Number of words to deal
        #[arg(long, default_value = "10")]
        count: usize,
    },

    /// Page further into the corpus and remember the position
    More,

    /// Toggle a word's mastered flag
    Master {
        /// Word id
        id: String,
    },

    /// Toggle a word's important flag
    Star {
        /// Word id
        id: String,
    },

    /// Bookmark management
    #[command(subcommand)]
    Bookmarks(BookmarkCommand),

    /// Daily mastery counters
    Stats {
        /// Show the last seven days
        #[arg(long)]
        week: bool,
    },

    /// Toggle haptic feedback
    Haptics,
}

#[derive(Subcommand)]
enum BookmarkCommand {
    /// List bookmarked words
    List,

    /// Bookmark a word
    Add {
        /// Word id
        id: String,
    },

    /// Remove a bookmark
    Remove {
        /// Word id
        id: String,
    },

    /// Remove all bookmarks
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut app = app::App::new(cli.data_dir).await?;

    let result = run_command(&mut app, cli.command, &cli.format).await;

    // Staged writes flush on shutdown even when the command itself failed.
    app.services.shutdown().await;
    result
}

async fn run_command(
    app: &mut app::App,
    command: Command,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Command::Words { offset, limit, mastered, important, review } => {
            commands::words::run(app, offset, limit, mastered, important, review, format)
        }
        Command::Shuffle { count } => commands::shuffle::run(app, count, format),
        Command::More => commands::more::run(app, format),
        Command::Master { id } => commands::master::run(app, &id),
        Command::Star { id } => commands::star::run(app, &id),
        Command::Bookmarks(subcmd) => match subcmd {
            BookmarkCommand::List => commands::bookmarks::run_list(app, format),
            BookmarkCommand::Add { id } => commands::bookmarks::run_add(app, &id),
            BookmarkCommand::Remove { id } => commands::bookmarks::run_remove(app, &id),
            BookmarkCommand::Clear => commands::bookmarks::run_clear(app).await,
        },
        Command::Stats { week } => commands::stats::run(app, week, format),
        Command::Haptics => commands::haptics::run(app),
    }
}
