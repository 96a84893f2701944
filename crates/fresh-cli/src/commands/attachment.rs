use std::collections::BTreeMap;

use fresh_core::{ColumnId, FreshenerRecord};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ColumnArgs, TableArgs};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct AttachmentResponse {
    table: String,
    column: ColumnId,
    record: Option<FreshenerRecord>,
}

#[derive(Debug, Serialize)]
struct AttachmentRow {
    column: ColumnId,
    policy_class: String,
    score_function_class: String,
    record_version: String,
    parameters: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct RemoveResponse {
    table: String,
    removed: Vec<ColumnId>,
}

/// Handle `fresh get`.
pub fn get(args: &ColumnArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let record = ctx.registry.retrieve(&args.table, &args.column)?;
    output(
        &AttachmentResponse {
            table: args.table.clone(),
            column: args.column.clone(),
            record,
        },
        flags.format,
    )
}

/// Handle `fresh list`.
pub fn list(args: &TableArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&rows(ctx, &args.table)?, flags.format)
}

fn rows(ctx: &AppContext, table: &str) -> anyhow::Result<Vec<AttachmentRow>> {
    Ok(ctx
        .registry
        .retrieve_all(table)?
        .into_iter()
        .map(|(column, record)| AttachmentRow {
            column,
            policy_class: record.policy_class,
            score_function_class: record.score_function_class,
            record_version: record.record_version,
            parameters: record.parameters,
        })
        .collect())
}

/// Handle `fresh remove`.
pub fn remove(args: &ColumnArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.registry.remove(&args.table, &args.column)?;
    output(
        &RemoveResponse {
            table: args.table.clone(),
            removed: vec![args.column.clone()],
        },
        flags.format,
    )
}

/// Handle `fresh remove-all`.
pub fn remove_all(args: &TableArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let removed = ctx.registry.remove_all(&args.table)?;
    output(
        &RemoveResponse {
            table: args.table.clone(),
            removed: removed.into_iter().collect(),
        },
        flags.format,
    )
}
