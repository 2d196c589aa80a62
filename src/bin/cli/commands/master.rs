use anyhow::Result;

use crate::app::App;

pub fn run(app: &mut App, id: &str) -> Result<()> {
    let view = app.find_word(id)?;
    let services = &mut app.services;

    match services.words.toggle_mastered(&view.id) {
        Some(true) => {
            services.stats.record_mastered();
            println!(
                "Mastered '{}' ({} today)",
                view.word,
                services.stats.today_stats().mastered_count
            );
        }
        Some(false) => {
            services.stats.record_unmastered();
            println!("Unmastered '{}'", view.word);
        }
        // find_word already proved the id exists.
        None => {}
    }

    Ok(())
}
