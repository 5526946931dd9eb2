//! Subcommand implementations.

mod draft;
mod generate;
mod revise;

use std::path::Path;

use anyhow::Context;

use crate::cli::{Cli, Command};
use crate::client::ProposeClient;
use crate::draft::Draft;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = ProposeClient::new(&cli.server);
    match cli.command {
        Command::Draft { action } => draft::run(&cli.draft, action).await,
        Command::Generate { out } => {
            let draft = Draft::load(&cli.draft)?;
            generate::run(&client, &draft, out.as_deref()).await
        }
        Command::Revise {
            proposal,
            request,
            out,
        } => {
            let draft = Draft::load(&cli.draft)?;
            let current = tokio::fs::read_to_string(&proposal)
                .await
                .with_context(|| format!("failed to read proposal {}", proposal.display()))?;
            revise::run(&client, &draft, &current, &request, out.as_deref()).await
        }
        Command::Models => {
            let models = client.list_models().await?;
            for model in models.data {
                let marker = if model.id == models.default_model { "*" } else { " " };
                println!("{marker} {:<32} {:<18} {}", model.id, model.name, model.description);
            }
            Ok(())
        }
    }
}

/// Print to stdout or write to `out`.
async fn emit(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            tokio::fs::write(path, text)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
