//! Initialize command.

use console::style;

use crate::config::Settings;

/// Initialize the data directory and database.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let ctx = settings.create_db_context();
    ctx.init_schema().await?;

    if !settings.static_dir.join("index.html").exists() {
        println!(
            "{} No index.html in {}; GET / will return 404",
            style("!").yellow(),
            settings.static_dir.display()
        );
    }

    println!(
        "{} Initialized advisor database at {}",
        style("✓").green(),
        settings.database_url()
    );

    Ok(())
}
