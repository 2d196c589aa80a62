use anyhow::Result;

use crate::app::App;

pub fn run(app: &mut App, id: &str) -> Result<()> {
    let view = app.find_word(id)?;

    match app.services.words.toggle_important(&view.id) {
        Some(true) => println!("Starred '{}'", view.word),
        Some(false) => println!("Unstarred '{}'", view.word),
        None => {}
    }

    Ok(())
}
