/*
 * Botdesk - Admin Console for a Discord Bot
 * File Path: src/register.rs
 * Responsibility: Install the active commands as global Discord application commands
 */

use crate::commands::{CommandRecord, OptionRecord, DEFAULT_OPTION_KIND};
use anyhow::{Context, Result};
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::http::Http;
use serenity::model::application::{Command, CommandOptionType};
use serenity::model::id::ApplicationId;

fn build_option(option: &OptionRecord) -> CreateCommandOption {
    let kind = u8::try_from(option.kind).unwrap_or(DEFAULT_OPTION_KIND as u8);
    CreateCommandOption::new(CommandOptionType::from(kind), &option.name, &option.description)
        .required(option.required)
}

pub fn build_command(record: &CommandRecord) -> CreateCommand {
    record.options.iter().fold(
        CreateCommand::new(&record.name).description(&record.description),
        |command, option| command.add_option(build_option(option)),
    )
}

/// Builders for every active command, in source order.
pub fn build_active_commands(records: &[CommandRecord]) -> Vec<CreateCommand> {
    records.iter().filter(|r| r.active).map(build_command).collect()
}

/// Overwrite the application's global commands with the active ones.
/// Returns how many commands Discord now reports.
pub async fn register_global_commands(
    token: &str,
    application_id: u64,
    records: &[CommandRecord],
) -> Result<usize> {
    if application_id == 0 {
        anyhow::bail!("Application id must be non-zero");
    }

    let http = Http::new(token);
    http.set_application_id(ApplicationId::new(application_id));

    let commands = build_active_commands(records);
    tracing::info!(count = commands.len(), "registering global commands");

    let registered = Command::set_global_commands(&http, commands)
        .await
        .context("Discord rejected the global command registration")?;
    Ok(registered.len())
}
