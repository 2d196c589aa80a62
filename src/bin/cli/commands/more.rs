use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &mut App, format: &OutputFormat) -> Result<()> {
    let words = &mut app.services.words;
    let start = words.loaded_count();
    let batch = words.load_more_words(start);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&batch)?);
        }
        OutputFormat::Plain => {
            if batch.is_empty() {
                println!("Nothing left to load ({} words)", words.total_word_count());
            } else {
                for view in &batch {
                    println!("{}", super::word_line(view));
                }
                println!();
                println!(
                    "Loaded {} of {} words",
                    words.loaded_count(),
                    words.total_word_count()
                );
            }
        }
    }

    Ok(())
}
