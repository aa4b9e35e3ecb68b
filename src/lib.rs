/*
 * Botdesk - Admin Console for a Discord Bot
 * File Path: src/lib.rs
 * Responsibility: Shared library modules
 */

pub mod commands;
pub mod config;
pub mod init;
pub mod parameters;
pub mod register;
pub mod scanner;
pub mod server;

pub use commands::{extract_all_commands, CommandRecord, OptionRecord};
