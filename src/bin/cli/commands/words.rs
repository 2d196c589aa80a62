use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    offset: usize,
    limit: usize,
    mastered: bool,
    important: bool,
    review: bool,
    format: &OutputFormat,
) -> Result<()> {
    let words = &app.services.words;
    let views = if review {
        words.important_unmastered_words()
    } else if mastered {
        words.mastered_words()
    } else if important {
        words.important_words()
    } else {
        words.words(offset, limit)
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        OutputFormat::Plain => {
            if views.is_empty() {
                println!("(no words)");
            } else {
                for view in &views {
                    println!("{}", super::word_line(view));
                }
            }
            println!();
            println!(
                "{} shown, {} of {} mastered",
                views.len(),
                words.mastered_word_count(),
                words.total_word_count()
            );
        }
    }

    Ok(())
}
