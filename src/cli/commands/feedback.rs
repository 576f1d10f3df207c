//! Recent feedback listing.

use console::style;

use super::helpers::{stars, truncate};
use crate::config::Settings;

pub async fn cmd_feedback(settings: &Settings, limit: i64) -> anyhow::Result<()> {
    let entries = settings
        .create_db_context()
        .feedback()
        .recent(limit.max(0))
        .await?;

    if entries.is_empty() {
        println!("{} No feedback yet", style("!").yellow());
        return Ok(());
    }

    for entry in entries {
        println!(
            "{} {} {}",
            style(format!("#{}", entry.id)).bold(),
            style(stars(entry.rating)).yellow(),
            style(entry.timestamp.format("%Y-%m-%d %H:%M")).dim()
        );
        println!("  Q: {}", truncate(&entry.user_message, 72));
        println!("  A: {}", truncate(&entry.advisor_response, 72));
        if let Some(comment) = entry.comment.as_deref().filter(|c| !c.trim().is_empty()) {
            println!("  {} {}", style("Comment:").cyan(), truncate(comment, 64));
        }
    }

    Ok(())
}
