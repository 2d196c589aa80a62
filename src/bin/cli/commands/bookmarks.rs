use anyhow::{bail, Result};

use lexis::bookmarks::{BookmarkEntry, LoadState};
use lexis::words::WordId;

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let manager = &app.services.bookmarks;
    if let LoadState::Error(msg) = manager.state() {
        bail!("Bookmarks failed to load: {}", msg);
    }

    let entries = manager.bookmarks();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(entries)?);
        }
        OutputFormat::Plain => {
            if entries.is_empty() {
                println!("(no bookmarks)");
            } else {
                for entry in entries {
                    println!("{:>5}  {:<18} {}", entry.id.as_str(), entry.word, entry.meaning);
                }
                println!();
                println!("{} bookmarks", entries.len());
            }
        }
    }

    Ok(())
}

pub fn run_add(app: &mut App, id: &str) -> Result<()> {
    let view = app.find_word(id)?;
    let entry = BookmarkEntry::from(&view);

    if app.services.bookmarks.add(entry) {
        println!("Bookmarked '{}'", view.word);
    } else {
        println!("'{}' is already bookmarked", view.word);
    }

    Ok(())
}

pub fn run_remove(app: &mut App, id: &str) -> Result<()> {
    let word_id = WordId::from(id);

    if app.services.bookmarks.remove(&word_id) {
        println!("Removed bookmark '{}'", id);
    } else {
        println!("No bookmark with id '{}'", id);
    }

    Ok(())
}

pub async fn run_clear(app: &mut App) -> Result<()> {
    let count = app.services.bookmarks.bookmarks().len();
    app.services.bookmarks.clear_all().await;

    // A failed storage delete leaves the list untouched.
    if app.services.bookmarks.bookmarks().is_empty() {
        println!("Cleared {} bookmarks", count);
    } else {
        bail!("Failed to clear bookmarks; the stored list was left as it was");
    }

    Ok(())
}
