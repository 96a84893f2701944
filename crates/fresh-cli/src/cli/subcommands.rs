use std::path::PathBuf;

use clap::Subcommand;

/// Table layout commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TableCommands {
    /// Create a table from a JSON layout file.
    Create {
        name: String,
        /// JSON object with a `families` map, e.g.
        /// `{"families": {"model": {"group_type": true, "qualifiers": ["predictor"]}}}`.
        #[arg(long)]
        layout: PathBuf,
    },
    /// Drop a table and every attachment in it.
    Drop { name: String },
    /// List tables.
    List,
    /// Show a table's layout.
    Show { name: String },
}
