//! Feedback statistics command.

use console::style;

use crate::config::Settings;

pub async fn cmd_stats(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let stats = settings.create_db_context().feedback().aggregate().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", style("Feedback").bold());
    println!("  {:<18} {}", "Total:", stats.total_feedback);
    println!("  {:<18} {:.2}", "Average rating:", stats.average_rating);
    println!("  {:<18} {}", "Positive (4+):", stats.positive_feedback);
    let rate = format!("{:.2}%", stats.satisfaction_rate);
    let rate = if stats.satisfaction_rate >= 80.0 {
        style(rate).green()
    } else if stats.satisfaction_rate >= 50.0 {
        style(rate).yellow()
    } else {
        style(rate).red()
    };
    println!("  {:<18} {}", "Satisfaction:", rate);

    Ok(())
}
