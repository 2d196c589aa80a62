use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, count: usize, format: &OutputFormat) -> Result<()> {
    let mut views = app.services.words.shuffled_words();
    views.truncate(count);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        OutputFormat::Plain => {
            for view in &views {
                println!("{}", super::word_line(view));
            }
        }
    }

    Ok(())
}
