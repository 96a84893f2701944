use std::path::PathBuf;

use clap::{Args, Subcommand};
use fresh_core::ColumnId;
use fresh_registry::RegisterOptions;

use crate::cli::subcommands::TableCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Table layout management.
    Table {
        #[command(subcommand)]
        action: TableCommands,
    },
    /// Attach a freshener to a column.
    Register(RegisterArgs),
    /// Attach fresheners from a JSON file; nothing is written if any entry fails.
    RegisterMany(RegisterManyArgs),
    /// Show the freshener attached to a column.
    Get(ColumnArgs),
    /// List every freshener in a table.
    List(TableArgs),
    /// Remove the freshener attached to exactly one column.
    Remove(ColumnArgs),
    /// Remove every freshener in a table.
    RemoveAll(TableArgs),
    /// Re-validate the freshener attached to a column.
    Validate(ColumnArgs),
    /// Re-validate every freshener in a table.
    ValidateAll(TableArgs),
}

#[derive(Clone, Debug, Args)]
pub struct TableArgs {
    pub table: String,
}

#[derive(Clone, Debug, Args)]
pub struct ColumnArgs {
    pub table: String,
    /// `family` or `family:qualifier`.
    pub column: ColumnId,
}

#[derive(Clone, Debug, Args)]
pub struct RegisterArgs {
    pub table: String,
    /// `family` or `family:qualifier`.
    pub column: ColumnId,
    /// Freshness policy identifier.
    #[arg(long)]
    pub policy: String,
    /// Score function identifier.
    #[arg(long)]
    pub score_function: String,
    /// Parameter as `key=value`. Repeatable.
    #[arg(long = "param", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
    #[command(flatten)]
    pub flags: RegisterFlags,
}

#[derive(Clone, Debug, Args)]
pub struct RegisterManyArgs {
    pub table: String,
    /// JSON object mapping column names to records.
    #[arg(long)]
    pub file: PathBuf,
    #[command(flatten)]
    pub flags: RegisterFlags,
}

#[derive(Clone, Copy, Debug, Args)]
pub struct RegisterFlags {
    /// Replace existing attachments.
    #[arg(long)]
    pub overwrite: bool,
    /// Build the named components and merge their default parameters.
    #[arg(long)]
    pub instantiate: bool,
    /// Run component setup before collecting default parameters.
    #[arg(long, requires = "instantiate")]
    pub setup: bool,
}

impl RegisterFlags {
    pub const fn options(self) -> RegisterOptions {
        RegisterOptions::new()
            .overwrite(self.overwrite)
            .instantiate(self.instantiate)
            .setup(self.setup)
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
