// ABOUTME: Login flow asking for the space URL and API key, verified before saving
// ABOUTME: A rejected key leaves the stored configuration untouched

use anyhow::Result;
use backlog_sdk::{BacklogClient, BacklogError, User};

use super::{answer_or_cancel, require_interactive, Flow};
use crate::config::{Config, ConfigStore};
use crate::constants::ui::SPACE_URL_PLACEHOLDER;
use crate::prompt::{Echo, Prompter};

pub async fn login(prompter: &mut dyn Prompter, store: &ConfigStore) -> Result<Flow<User>> {
    require_interactive(prompter, "Run `bl auth login` from an interactive shell")?;

    // Fail before prompting so an unreadable file is never overwritten
    let existing = store.load()?;

    let space_url = answer_or_cancel!(prompter.input(
        "Space URL:",
        SPACE_URL_PLACEHOLDER,
        Echo::Plain,
        None
    )?);
    let api_key = answer_or_cancel!(prompter.input("API key:", "", Echo::Masked, None)?);

    let space_url = space_url.trim().trim_end_matches('/').to_string();
    let api_key = api_key.trim().to_string();
    if space_url.is_empty() || api_key.is_empty() {
        return Err(BacklogError::invalid_input("Space URL and API key are both required").into());
    }

    let client = BacklogClient::new(&space_url, &api_key)?;
    let user = client.get_myself().await?;
    log::debug!("Verified credentials for user id {}", user.id);

    store.save(&Config {
        space_url,
        api_key,
        default_project: existing.default_project,
    })?;

    Ok(Flow::Completed(user))
}
