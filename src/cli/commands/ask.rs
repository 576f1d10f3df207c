//! One-shot structured advice from the terminal.

use console::style;

use crate::advice;
use crate::config::Settings;
use crate::llm::{CompletionGateway, LlmClient};

pub async fn cmd_ask(settings: &Settings, message: &str) -> anyhow::Result<()> {
    let message = message.trim();
    if message.is_empty() {
        anyhow::bail!("Message cannot be empty");
    }

    let client = LlmClient::new(settings.llm.clone())?;
    println!(
        "{} Asking {}...",
        style("→").cyan(),
        style(client.model()).bold()
    );

    let raw = client
        .complete(Some(settings.llm.get_advice_prompt()), message)
        .await?;
    let outcome = advice::classify(&raw);
    if !outcome.is_structured() {
        println!(
            "{} Model did not return structured advice; showing its raw reply",
            style("!").yellow()
        );
    }
    let answer = outcome.into_advice();

    println!();
    println!("{}", style("Advice").green().bold());
    println!("{}\n", answer.advice);
    println!("{}", style("Reasoning").cyan().bold());
    println!("{}\n", answer.reasoning_path);
    println!("{}", style("Ethical check").cyan().bold());
    println!("{}\n", answer.ethical_check);
    println!("{}", style("Self-reflection").cyan().bold());
    println!("{}", answer.self_reflection);

    Ok(())
}
