use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use fresh_core::{FamilyLayout, TableLayout};
use fresh_store::TableCatalog;
use serde::{Deserialize, Serialize};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TableCommands;
use crate::context::AppContext;
use crate::output::output;

/// On-disk layout file. The table name comes from the command line.
#[derive(Debug, Deserialize)]
struct LayoutFile {
    #[serde(default)]
    families: BTreeMap<String, FamilyLayout>,
}

#[derive(Debug, Serialize)]
struct TableResponse {
    table: String,
    status: &'static str,
}

/// Handle `fresh table <action>`.
pub fn handle(action: &TableCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        TableCommands::Create { name, layout } => {
            let layout = read_layout(name, layout)?;
            ctx.store().create_table(&layout)?;
            output(
                &TableResponse {
                    table: name.clone(),
                    status: "created",
                },
                flags.format,
            )
        }
        TableCommands::Drop { name } => {
            ctx.store().drop_table(name)?;
            output(
                &TableResponse {
                    table: name.clone(),
                    status: "dropped",
                },
                flags.format,
            )
        }
        TableCommands::List => output(&ctx.store().tables()?, flags.format),
        TableCommands::Show { name } => output(&ctx.store().layout(name)?, flags.format),
    }
}

fn read_layout(name: &str, path: &Path) -> anyhow::Result<TableLayout> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file {}", path.display()))?;
    parse_layout(name, &raw).with_context(|| format!("invalid layout file {}", path.display()))
}

fn parse_layout(name: &str, raw: &str) -> anyhow::Result<TableLayout> {
    let file: LayoutFile = serde_json::from_str(raw)?;
    let layout = TableLayout {
        name: name.to_string(),
        families: file.families,
    };
    layout.validate()?;
    Ok(layout)
}
