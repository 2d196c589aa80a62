use anyhow::Result;

use crate::app::App;

pub fn run(app: &mut App) -> Result<()> {
    let enabled = app.services.settings.toggle_haptics();
    println!(
        "Haptic feedback {}",
        if enabled { "enabled" } else { "disabled" }
    );

    Ok(())
}
