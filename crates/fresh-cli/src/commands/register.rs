use std::collections::BTreeMap;

use anyhow::Context;
use fresh_core::{ColumnId, FreshenerRecord, ParameterDescription};
use fresh_registry::ParameterOverrides;
use serde::{Deserialize, Serialize};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{RegisterArgs, RegisterManyArgs};
use crate::context::AppContext;
use crate::output::output;

/// One entry of a `register-many` file. A missing version means the current one.
#[derive(Debug, Deserialize)]
struct RecordEntry {
    #[serde(default)]
    record_version: Option<String>,
    policy_class: String,
    score_function_class: String,
    #[serde(default)]
    parameters: BTreeMap<String, String>,
    #[serde(default)]
    descriptions: BTreeMap<String, ParameterDescription>,
}

#[derive(Debug, Serialize)]
struct RegisterResponse {
    table: String,
    column: ColumnId,
    record: Option<FreshenerRecord>,
}

#[derive(Debug, Serialize)]
struct RegisterManyResponse {
    table: String,
    registered: Vec<ColumnId>,
}

/// Handle `fresh register`.
pub fn handle(args: RegisterArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let overrides = ParameterOverrides {
        parameters: args.params.into_iter().collect(),
        descriptions: BTreeMap::new(),
    };
    ctx.registry.register_with(
        &args.table,
        &args.column,
        &args.policy,
        &args.score_function,
        overrides,
        args.flags.options(),
    )?;

    let record = ctx.registry.retrieve(&args.table, &args.column)?;
    output(
        &RegisterResponse {
            table: args.table,
            column: args.column,
            record,
        },
        flags.format,
    )
}

/// Handle `fresh register-many`.
pub fn handle_many(
    args: &RegisterManyArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let records = parse_entries(&raw, &ctx.registry.gate().current())
        .with_context(|| format!("invalid record file {}", args.file.display()))?;
    let registered = records.keys().cloned().collect();

    ctx.registry
        .register_many(&args.table, records, args.flags.options())?;
    output(
        &RegisterManyResponse {
            table: args.table.clone(),
            registered,
        },
        flags.format,
    )
}

fn parse_entries(
    raw: &str,
    current_version: &str,
) -> anyhow::Result<BTreeMap<ColumnId, FreshenerRecord>> {
    let entries: BTreeMap<ColumnId, RecordEntry> = serde_json::from_str(raw)?;
    Ok(entries
        .into_iter()
        .map(|(column, entry)| {
            let version = entry
                .record_version
                .unwrap_or_else(|| current_version.to_string());
            let record = FreshenerRecord::new(version, entry.policy_class, entry.score_function_class)
                .with_parameters(entry.parameters)
                .with_descriptions(entry.descriptions);
            (column, record)
        })
        .collect())
}
