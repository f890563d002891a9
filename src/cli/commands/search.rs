//! Search command implementation.

use crate::article::ArticleRecord;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(
    query: &str,
    model: Option<String>,
    raw: bool,
    mut settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Search, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    if let Some(model) = model {
        settings.openai.chat_model = model;
    }

    let mut session = Session::setup(&settings).await?;
    let orchestrator = Orchestrator::new(session.model(), &settings);

    let spinner = Output::spinner("Fetching news...");
    let blocks = orchestrator.run(session.client_mut(), query).await;
    spinner.finish_and_clear();

    session.teardown().await;

    if blocks.is_empty() {
        Output::warning("No news to display (the query may have failed; re-run with -v).");
        return Ok(());
    }

    if raw {
        for block in &blocks {
            println!("{}\n", block);
        }
        return Ok(());
    }

    Output::header(&format!("News for \"{}\"", query));
    for block in &blocks {
        let record = ArticleRecord::parse(block);
        if record.title.is_empty() {
            // Placeholder text rather than an article block.
            Output::info(block);
        } else {
            Output::article(&record);
        }
    }
    println!();

    Ok(())
}
