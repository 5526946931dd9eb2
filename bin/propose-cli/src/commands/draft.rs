use std::path::Path;

use anyhow::{Context, bail};
use tracing::info;

use crate::cli::DraftAction;
use crate::draft::{Draft, DraftField};

pub async fn run(path: &Path, action: DraftAction) -> anyhow::Result<()> {
    match action {
        DraftAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists; pass --force to overwrite", path.display());
            }
            Draft::default().save(path)?;
            info!(path = %path.display(), "draft initialised");
            eprintln!("created {}", path.display());
        }
        DraftAction::Show => {
            let draft = Draft::load(path)?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
        DraftAction::Set { field, value } => {
            let mut draft = Draft::load(path)?;
            let value = resolve_value(field, value).await?;
            draft.set(field, value)?;
            draft.save(path)?;
            info!(%field, "draft updated");
        }
    }
    Ok(())
}

/// `@path` reads the value from a file, for long text like price lists.
async fn resolve_value(field: DraftField, value: String) -> anyhow::Result<String> {
    match value.strip_prefix('@') {
        Some(file) => tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("failed to read {field} from {file}")),
        None => Ok(value),
    }
}
