use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, week: bool, format: &OutputFormat) -> Result<()> {
    let tracker = &app.services.stats;

    if week {
        let days = tracker.week_stats();
        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&days)?);
            }
            OutputFormat::Plain => {
                for day in &days {
                    println!("{}  {:>3}", day.date, day.mastered_count);
                }
                let total: u32 = days.iter().map(|d| d.mastered_count).sum();
                println!();
                println!("{} mastered this week", total);
            }
        }
    } else {
        let today = tracker.today_stats();
        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&today)?);
            }
            OutputFormat::Plain => {
                println!("{} mastered today", today.mastered_count);
            }
        }
    }

    Ok(())
}
