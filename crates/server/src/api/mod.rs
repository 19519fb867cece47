use std::path::PathBuf;

use anyhow::Context;
use shared::{domain::Account, error::ApiException};
use tracing::error;

#[derive(Debug, Clone)]
pub struct ApiContext {
    pub account_file: PathBuf,
}

/// Reads the account fixture from disk.
///
/// The file is re-read on every call so edits show up on the next refresh.
pub async fn load_account(ctx: &ApiContext) -> Result<Account, ApiException> {
    read_account(ctx).await.map_err(unexpected)
}

pub async fn refresh_account(
    ctx: &ApiContext,
    current: &Account,
) -> Result<Account, ApiException> {
    tracing::debug!(
        calendars = current.calendars.len(),
        events = current.event_count(),
        "client requested account refresh"
    );
    load_account(ctx).await
}

async fn read_account(ctx: &ApiContext) -> anyhow::Result<Account> {
    let raw = tokio::fs::read_to_string(&ctx.account_file)
        .await
        .with_context(|| {
            format!(
                "failed to read account file '{}'",
                ctx.account_file.display()
            )
        })?;
    serde_json::from_str(&raw).with_context(|| {
        format!(
            "failed to parse account file '{}'",
            ctx.account_file.display()
        )
    })
}

fn unexpected(err: anyhow::Error) -> ApiException {
    error!("account lookup failed: {err:#}");
    ApiException::unexpected()
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
